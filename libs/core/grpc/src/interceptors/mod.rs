//! Server-side call interceptors.
//!
//! An interceptor sees every call before the service does and every response
//! on its way back out. Unary and streaming calls run through separate chains;
//! within a chain the first-registered interceptor is the outermost one.

use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tonic::Status;

pub mod auth;
pub mod compose;
pub mod layer;
pub mod metrics;
pub mod tracing;

pub use auth::AuthInterceptor;
pub use compose::{ComposedInterceptor, chain_interceptors, compose_interceptors};
pub use layer::{InterceptorLayer, InterceptorService};
pub use metrics::MetricsInterceptor;
pub use tracing::{REQUEST_ID_HEADER, RequestIdInterceptor};

/// Raw gRPC request as seen by the transport.
pub type GrpcRequest = http::Request<tonic::body::Body>;

/// Raw gRPC response as produced by a service.
pub type GrpcResponse = http::Response<tonic::body::Body>;

/// Outcome of an intercepted call. `Err` short-circuits the chain.
pub type InterceptResult = Result<GrpcResponse, Status>;

/// Interceptor shared between chains and connections.
pub type SharedInterceptor = Arc<dyn Interceptor>;

/// Metadata about the call being intercepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallInfo {
    full_method: Arc<str>,
    streaming: bool,
}

impl CallInfo {
    pub fn new(full_method: impl Into<Arc<str>>, streaming: bool) -> Self {
        Self {
            full_method: full_method.into(),
            streaming,
        }
    }

    /// Full method path, e.g. `/hello.Greeter/SayHello`
    pub fn full_method(&self) -> &str {
        &self.full_method
    }

    /// Service part of the method path, e.g. `hello.Greeter`
    pub fn service(&self) -> &str {
        self.full_method
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default()
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }
}

/// The remainder of the chain: the next interceptor, or the service itself.
#[derive(Clone)]
pub struct Next {
    handler: Arc<dyn Fn(GrpcRequest) -> BoxFuture<'static, InterceptResult> + Send + Sync>,
}

impl Next {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(GrpcRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InterceptResult> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |request| -> BoxFuture<'static, InterceptResult> {
                Box::pin(handler(request))
            }),
        }
    }

    /// Hand the request to the rest of the chain.
    pub fn run(self, request: GrpcRequest) -> BoxFuture<'static, InterceptResult> {
        (self.handler)(request)
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// A server-side interceptor.
///
/// Implemented for any `Fn(GrpcRequest, CallInfo, Next) -> impl Future<Output = InterceptResult>`,
/// so plain closures and async functions can be registered directly.
///
/// # Example
/// ```ignore
/// use grpc_serve::interceptors::{CallInfo, GrpcRequest, Next};
///
/// async fn log_calls(request: GrpcRequest, info: CallInfo, next: Next) -> InterceptResult {
///     tracing::info!(method = info.full_method(), "call started");
///     let response = next.run(request).await;
///     tracing::info!(method = info.full_method(), ok = response.is_ok(), "call finished");
///     response
/// }
///
/// let builder = RpcServerBuilder::new().with_unary_interceptor(log_calls);
/// ```
pub trait Interceptor: Send + Sync + 'static {
    fn intercept(
        &self,
        request: GrpcRequest,
        info: CallInfo,
        next: Next,
    ) -> BoxFuture<'static, InterceptResult>;
}

impl<F, Fut> Interceptor for F
where
    F: Fn(GrpcRequest, CallInfo, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InterceptResult> + Send + 'static,
{
    fn intercept(
        &self,
        request: GrpcRequest,
        info: CallInfo,
        next: Next,
    ) -> BoxFuture<'static, InterceptResult> {
        Box::pin(self(request, info, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_info_service() {
        let info = CallInfo::new("/hello.Greeter/SayHello", false);
        assert_eq!(info.full_method(), "/hello.Greeter/SayHello");
        assert_eq!(info.service(), "hello.Greeter");
        assert!(!info.is_streaming());
    }

    #[tokio::test]
    async fn test_closure_is_an_interceptor() {
        let interceptor = |_request: GrpcRequest, _info: CallInfo, _next: Next| async {
            Err::<GrpcResponse, _>(Status::permission_denied("nope"))
        };
        let next = Next::new(|_request| async {
            Ok(http::Response::new(tonic::body::Body::default()))
        });

        let result = interceptor
            .intercept(
                http::Request::new(tonic::body::Body::default()),
                CallInfo::new("/a.B/C", false),
                next,
            )
            .await;

        assert_eq!(result.unwrap_err().code(), tonic::Code::PermissionDenied);
    }
}
