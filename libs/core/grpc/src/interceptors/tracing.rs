use super::{CallInfo, GrpcRequest, InterceptResult, Interceptor, Next};
use futures::future::BoxFuture;
use http::HeaderValue;
use std::time::Instant;

/// Metadata key carrying the correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Interceptor for request correlation
///
/// Reuses the caller's `x-request-id` when present, otherwise generates one,
/// and echoes it on the response so clients can correlate logs across services.
/// Each call is logged with its method, outcome and latency.
///
/// # Example
/// ```ignore
/// use grpc_serve::interceptors::RequestIdInterceptor;
///
/// let builder = RpcServerBuilder::new()
///     .with_unary_interceptor(RequestIdInterceptor::new())
///     .with_stream_interceptor(RequestIdInterceptor::new());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestIdInterceptor;

impl RequestIdInterceptor {
    /// Create a new request id interceptor
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for RequestIdInterceptor {
    fn intercept(
        &self,
        mut request: GrpcRequest,
        info: CallInfo,
        next: Next,
    ) -> BoxFuture<'static, InterceptResult> {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .cloned()
            .unwrap_or_else(|| {
                HeaderValue::try_from(uuid::Uuid::new_v4().to_string())
                    .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
            });
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER, request_id.clone());

        Box::pin(async move {
            let started = Instant::now();
            let id = request_id.to_str().unwrap_or("invalid").to_string();

            tracing::debug!(
                target: "grpc_serve",
                request_id = %id,
                method = info.full_method(),
                streaming = info.is_streaming(),
                "Incoming gRPC call"
            );

            let result = next.run(request).await;

            match &result {
                Ok(_) => tracing::debug!(
                    target: "grpc_serve",
                    request_id = %id,
                    method = info.full_method(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "gRPC call completed"
                ),
                Err(status) => tracing::info!(
                    target: "grpc_serve",
                    request_id = %id,
                    method = info.full_method(),
                    code = ?status.code(),
                    "gRPC call rejected"
                ),
            }

            result.map(|mut response| {
                response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
                response
            })
        })
    }
}
