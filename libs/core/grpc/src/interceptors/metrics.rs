use super::{CallInfo, GrpcRequest, InterceptResult, Interceptor, Next};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Simple metrics interceptor for counting calls
///
/// Counts every call that reaches it and every call rejected further down the
/// chain. Clones share the same counters, so keep one clone to read them after
/// handing another to the builder.
///
/// # Example
/// ```ignore
/// use grpc_serve::interceptors::MetricsInterceptor;
///
/// let metrics = MetricsInterceptor::new();
/// let builder = RpcServerBuilder::new().with_unary_interceptor(metrics.clone());
///
/// // Later, check metrics
/// println!("Total calls: {}", metrics.total_calls());
/// ```
#[derive(Clone, Debug, Default)]
pub struct MetricsInterceptor {
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    total: AtomicU64,
    rejected: AtomicU64,
}

impl MetricsInterceptor {
    /// Create a new metrics interceptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of calls seen
    pub fn total_calls(&self) -> u64 {
        self.counters.total.load(Ordering::Relaxed)
    }

    /// Get the number of calls that ended in an error status
    pub fn rejected_calls(&self) -> u64 {
        self.counters.rejected.load(Ordering::Relaxed)
    }
}

impl Interceptor for MetricsInterceptor {
    fn intercept(
        &self,
        request: GrpcRequest,
        info: CallInfo,
        next: Next,
    ) -> BoxFuture<'static, InterceptResult> {
        let counters = Arc::clone(&self.counters);
        let count = counters.total.fetch_add(1, Ordering::Relaxed) + 1;

        tracing::trace!(
            target: "grpc_serve",
            method = info.full_method(),
            count,
            "gRPC call metrics"
        );

        Box::pin(async move {
            let result = next.run(request).await;
            if result.is_err() {
                counters.rejected.fetch_add(1, Ordering::Relaxed);
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptors::GrpcResponse;
    use tonic::Status;
    use tonic::body::Body;

    fn info() -> CallInfo {
        CallInfo::new("/test.Echo/Say", false)
    }

    #[tokio::test]
    async fn test_metrics_counting() {
        let metrics = MetricsInterceptor::new();
        assert_eq!(metrics.total_calls(), 0);

        let ok = Next::new(|_request| async { Ok(GrpcResponse::new(Body::default())) });
        let _ = metrics
            .intercept(GrpcRequest::new(Body::default()), info(), ok.clone())
            .await;
        let _ = metrics
            .intercept(GrpcRequest::new(Body::default()), info(), ok)
            .await;

        assert_eq!(metrics.total_calls(), 2);
        assert_eq!(metrics.rejected_calls(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_counters() {
        let metrics = MetricsInterceptor::new();
        let installed = metrics.clone();

        let failing = Next::new(|_request| async {
            Err::<GrpcResponse, _>(Status::internal("boom"))
        });
        let _ = installed
            .intercept(GrpcRequest::new(Body::default()), info(), failing)
            .await;

        assert_eq!(metrics.total_calls(), 1);
        assert_eq!(metrics.rejected_calls(), 1);
    }
}
