use super::{CallInfo, GrpcRequest, InterceptResult, Interceptor, Next};
use futures::future::BoxFuture;
use tonic::Status;

/// Interceptor for checking caller credentials
///
/// Compares the `authorization` metadata of every call against the expected
/// value and rejects mismatches with `UNAUTHENTICATED` before the service runs.
/// Supports Bearer tokens, API keys, and custom authorization header values.
///
/// # Example
/// ```ignore
/// use grpc_serve::interceptors::AuthInterceptor;
///
/// let auth = AuthInterceptor::bearer("my-jwt-token");
/// let builder = RpcServerBuilder::new().with_unary_interceptor(auth);
/// ```
#[derive(Clone)]
pub struct AuthInterceptor {
    expected: String,
    exempt_services: Vec<String>,
}

impl AuthInterceptor {
    /// Expect a Bearer token (OAuth 2.0 / JWT)
    ///
    /// # Example
    /// ```ignore
    /// let auth = AuthInterceptor::bearer("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...");
    /// ```
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::custom(format!("Bearer {}", token.into()))
    }

    /// Expect a custom authorization header value
    ///
    /// # Example
    /// ```ignore
    /// let auth = AuthInterceptor::custom("Basic dXNlcjpwYXNz");
    /// ```
    pub fn custom(value: impl Into<String>) -> Self {
        Self {
            expected: value.into(),
            exempt_services: Vec::new(),
        }
    }

    /// Expect a raw API key
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::custom(key)
    }

    /// Let calls to `service` through without credentials (e.g. `grpc.health.v1.Health`).
    pub fn exempt(mut self, service: impl Into<String>) -> Self {
        self.exempt_services.push(service.into());
        self
    }

    fn check(&self, request: &GrpcRequest, info: &CallInfo) -> Result<(), Status> {
        if self.exempt_services.iter().any(|s| s == info.service()) {
            return Ok(());
        }

        match request.headers().get("authorization") {
            None => Err(Status::unauthenticated("Missing authorization metadata")),
            Some(value) if value.as_bytes() == self.expected.as_bytes() => Ok(()),
            Some(_) => Err(Status::unauthenticated("Invalid credentials")),
        }
    }
}

impl std::fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInterceptor")
            .field("expected", &"<redacted>")
            .field("exempt_services", &self.exempt_services)
            .finish()
    }
}

impl Interceptor for AuthInterceptor {
    fn intercept(
        &self,
        request: GrpcRequest,
        info: CallInfo,
        next: Next,
    ) -> BoxFuture<'static, InterceptResult> {
        if let Err(status) = self.check(&request, &info) {
            tracing::debug!(
                target: "grpc_serve",
                method = info.full_method(),
                "Rejected unauthenticated call"
            );
            return Box::pin(async move { Err(status) });
        }
        next.run(request)
    }
}
