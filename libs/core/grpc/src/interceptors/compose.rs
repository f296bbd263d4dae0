use super::{CallInfo, GrpcRequest, InterceptResult, Interceptor, Next, SharedInterceptor};
use futures::future::BoxFuture;
use std::sync::Arc;

/// Compose two interceptors into a single interceptor
///
/// `first` wraps `second`: it sees the request first and the response last.
///
/// # Example
/// ```ignore
/// use grpc_serve::interceptors::{AuthInterceptor, RequestIdInterceptor, compose_interceptors};
///
/// let auth = AuthInterceptor::bearer("token");
/// let request_id = RequestIdInterceptor::new();
/// let composed = compose_interceptors(request_id, auth);
///
/// let builder = RpcServerBuilder::new().with_unary_interceptor(composed);
/// ```
pub fn compose_interceptors<A, B>(first: A, second: B) -> ComposedInterceptor<A, B>
where
    A: Interceptor,
    B: Interceptor,
{
    ComposedInterceptor {
        first: Arc::new(first),
        second: Arc::new(second),
    }
}

/// Fold an ordered list into one composite interceptor.
///
/// The first element becomes the outermost layer. Returns `None` for an empty
/// list so callers can skip installing a chain at all.
pub fn chain_interceptors<I>(interceptors: I) -> Option<SharedInterceptor>
where
    I: IntoIterator<Item = SharedInterceptor>,
    I::IntoIter: DoubleEndedIterator,
{
    interceptors
        .into_iter()
        .rev()
        .reduce(|inner, outer| -> SharedInterceptor {
            Arc::new(ComposedInterceptor {
                first: outer,
                second: inner,
            })
        })
}

/// An interceptor that applies two interceptors, one wrapping the other
///
/// This is the return type of `compose_interceptors()`. You typically
/// don't need to construct this directly.
#[derive(Debug)]
pub struct ComposedInterceptor<A: ?Sized, B: ?Sized> {
    first: Arc<A>,
    second: Arc<B>,
}

impl<A: ?Sized, B: ?Sized> Clone for ComposedInterceptor<A, B> {
    fn clone(&self) -> Self {
        Self {
            first: Arc::clone(&self.first),
            second: Arc::clone(&self.second),
        }
    }
}

impl<A, B> Interceptor for ComposedInterceptor<A, B>
where
    A: Interceptor + ?Sized,
    B: Interceptor + ?Sized,
{
    fn intercept(
        &self,
        request: GrpcRequest,
        info: CallInfo,
        next: Next,
    ) -> BoxFuture<'static, InterceptResult> {
        let second = Arc::clone(&self.second);
        let inner_info = info.clone();
        let inner = Next::new(move |request| {
            second.intercept(request, inner_info.clone(), next.clone())
        });
        self.first.intercept(request, info, inner)
    }
}
