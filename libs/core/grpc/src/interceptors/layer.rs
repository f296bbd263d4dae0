//! Tower glue that runs interceptor chains in front of the routed services.

use super::{CallInfo, GrpcRequest, GrpcResponse, Next, SharedInterceptor};
use futures::future::BoxFuture;
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};

/// Installs the composite unary and stream interceptors on a service.
///
/// Calls whose method path is in `streaming_methods` go through the stream
/// chain, all other calls go through the unary chain. A missing chain means
/// the call is forwarded untouched.
#[derive(Clone, Default)]
pub struct InterceptorLayer {
    unary: Option<SharedInterceptor>,
    stream: Option<SharedInterceptor>,
    streaming_methods: Arc<HashSet<String>>,
}

impl InterceptorLayer {
    pub fn new(
        unary: Option<SharedInterceptor>,
        stream: Option<SharedInterceptor>,
        streaming_methods: HashSet<String>,
    ) -> Self {
        Self {
            unary,
            stream,
            streaming_methods: Arc::new(streaming_methods),
        }
    }

    pub fn has_unary(&self) -> bool {
        self.unary.is_some()
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }
}

impl fmt::Debug for InterceptorLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorLayer")
            .field("unary", &self.unary.is_some())
            .field("stream", &self.stream.is_some())
            .field("streaming_methods", &self.streaming_methods)
            .finish()
    }
}

impl<S> Layer<S> for InterceptorLayer {
    type Service = InterceptorService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InterceptorService {
            inner,
            layer: self.clone(),
        }
    }
}

/// Service produced by [`InterceptorLayer`].
#[derive(Clone, Debug)]
pub struct InterceptorService<S> {
    inner: S,
    layer: InterceptorLayer,
}

impl<S> Service<GrpcRequest> for InterceptorService<S>
where
    S: Service<GrpcRequest, Response = GrpcResponse, Error = Infallible>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    type Response = GrpcResponse;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<GrpcResponse, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: GrpcRequest) -> Self::Future {
        // Take the service that was driven to readiness, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let full_method = request.uri().path().to_string();
        let streaming = self.layer.streaming_methods.contains(&full_method);
        let chain = if streaming {
            self.layer.stream.clone()
        } else {
            self.layer.unary.clone()
        };

        let Some(chain) = chain else {
            return Box::pin(inner.call(request));
        };

        let info = CallInfo::new(full_method, streaming);
        let terminal = Next::new(move |request| {
            let service = inner.clone();
            async move {
                match service.oneshot(request).await {
                    Ok(response) => Ok(response),
                    Err(never) => match never {},
                }
            }
        });

        Box::pin(async move {
            let response = chain
                .intercept(request, info, terminal)
                .await
                .unwrap_or_else(|status| status.into_http());
            Ok(response)
        })
    }
}
