//! HTTP server builder.

use crate::pattern::Pattern;
use crate::server::HttpServer;
use crate::timeouts::HttpTimeouts;
use crate::tls::rustls_config;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::handler::Handler;
use axum::response::IntoResponse;
use axum::routing::{MethodRouter, Route, any, any_service};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use serve_core::{ConfigurationError, RouteError, TlsConfig};
use std::convert::Infallible;
use std::fmt;
use tower::{Layer, Service};
use tower_http::timeout::TimeoutLayer;
use tracing::debug;

type Middleware = Box<dyn FnOnce(Router) -> Router + Send>;

/// Collects routes and middleware, then builds an [`HttpServer`].
///
/// Registering a pattern twice keeps the last handler. Middleware wraps in
/// registration order: the first one added sees the request first and the
/// response last.
///
/// ```ignore
/// use http_serve::{HttpServerBuilder, middleware::security_headers};
///
/// let server = HttpServerBuilder::new()
///     .with_middleware(axum::middleware::from_fn(security_headers))
///     .handle_func("/hello", || async { "Hello, world!" })?
///     .route("/users/{id}", get(show_user).delete(delete_user))?
///     .build();
/// ```
#[derive(Default)]
pub struct HttpServerBuilder {
    routes: Vec<(String, MethodRouter)>,
    middleware: Vec<Middleware>,
    timeouts: HttpTimeouts,
    tls: Option<RustlsConfig>,
}

impl HttpServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `pattern` with a tower service, for every method.
    pub fn handle<S>(self, pattern: &str, service: S) -> Result<Self, RouteError>
    where
        S: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        S::Response: IntoResponse + 'static,
        S::Future: Send + 'static,
    {
        self.route(pattern, any_service(service))
    }

    /// Serve `pattern` with a handler function, for every method.
    pub fn handle_func<H, T>(self, pattern: &str, handler: H) -> Result<Self, RouteError>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(pattern, any(handler))
    }

    /// Serve `pattern` with a per-method router.
    pub fn route(mut self, pattern: &str, router: MethodRouter) -> Result<Self, RouteError> {
        let parsed = Pattern::parse(pattern)?;

        let mut existing = None;
        for (index, (registered, _)) in self.routes.iter().enumerate() {
            if registered == pattern {
                existing = Some(index);
                continue;
            }
            if parsed.conflicts_with(&Pattern::parse(registered)?) {
                return Err(RouteError::Conflict {
                    pattern: pattern.to_string(),
                    existing: registered.clone(),
                });
            }
        }

        match existing {
            Some(index) => {
                debug!(pattern, "Replacing HTTP route");
                self.routes[index].1 = router;
            }
            None => {
                debug!(pattern, "Registering HTTP route");
                self.routes.push((parsed.as_str().to_string(), router));
            }
        }
        Ok(self)
    }

    /// Wrap every route in `layer`.
    pub fn with_middleware<L>(mut self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.middleware.push(Box::new(move |router| router.layer(layer)));
        self
    }

    /// Serve over TLS. The PEM material is parsed here.
    pub fn with_tls(mut self, tls: TlsConfig) -> Result<Self, ConfigurationError> {
        self.tls = Some(rustls_config(&tls)?);
        Ok(self)
    }

    /// Replace the default 5s read, 10s write and 15s idle timeouts.
    pub fn with_timeouts(mut self, timeouts: HttpTimeouts) -> Result<Self, ConfigurationError> {
        timeouts.validate()?;
        self.timeouts = timeouts;
        Ok(self)
    }

    pub fn build(self) -> HttpServer {
        let mut patterns = Vec::with_capacity(self.routes.len());
        let mut router = Router::new();
        for (pattern, method_router) in self.routes {
            router = router.route(&pattern, method_router);
            patterns.push(pattern);
        }

        // Innermost first, so the first-registered middleware ends up outermost
        for middleware in self.middleware.into_iter().rev() {
            router = middleware(router);
        }

        let router = router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            self.timeouts.write,
        ));

        debug!(routes = ?patterns, tls = self.tls.is_some(), "HTTP server built");
        HttpServer::new(router, patterns, self.timeouts, self.tls)
    }
}

impl fmt::Debug for HttpServerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patterns: Vec<_> = self.routes.iter().map(|(pattern, _)| pattern).collect();
        f.debug_struct("HttpServerBuilder")
            .field("routes", &patterns)
            .field("middleware", &self.middleware.len())
            .field("timeouts", &self.timeouts)
            .field("tls", &self.tls.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_same_pattern_is_replaced_in_place() {
        let server = HttpServerBuilder::new()
            .handle_func("/a", || async { "a" })
            .unwrap()
            .handle_func("/b", || async { "b" })
            .unwrap()
            .handle_func("/a", || async { "a2" })
            .unwrap()
            .build();

        assert_eq!(server.patterns(), ["/a", "/b"]);
    }

    #[test]
    fn test_invalid_pattern_fails_immediately() {
        let err = HttpServerBuilder::new()
            .handle_func("no-slash", || async { "" })
            .unwrap_err();
        assert_eq!(err, RouteError::MissingLeadingSlash("no-slash".to_string()));
    }

    #[test]
    fn test_conflicting_capture_names() {
        let err = HttpServerBuilder::new()
            .handle_func("/users/{id}", || async { "" })
            .unwrap()
            .handle_func("/users/{name}", || async { "" })
            .unwrap_err();

        assert_eq!(
            err,
            RouteError::Conflict {
                pattern: "/users/{name}".to_string(),
                existing: "/users/{id}".to_string(),
            }
        );
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = HttpServerBuilder::new()
            .with_timeouts(HttpTimeouts::new(
                Duration::ZERO,
                Duration::from_secs(1),
                Duration::from_secs(1),
            ))
            .unwrap_err();
        assert_eq!(err, ConfigurationError::ZeroTimeout("read"));
    }

    #[test]
    fn test_default_timeouts() {
        let server = HttpServerBuilder::new().build();
        assert_eq!(server.timeouts(), HttpTimeouts::default());
        assert!(!server.is_secure());
    }
}
