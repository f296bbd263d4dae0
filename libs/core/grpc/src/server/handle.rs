//! The built server handle registrars attach services to.

use super::config::MessageLimits;
use crate::interceptors::{InterceptorLayer, InterceptorService, SharedInterceptor};
use async_trait::async_trait;
use serve_core::{AttachError, Serve};
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::body::Body;
use tonic::server::NamedService;
use tonic::service::{Routes, RoutesBuilder};
use tonic::transport::Server;
use tonic_health::ServingStatus;
use tonic_health::server::HealthReporter;
use tower::{Layer, Service};
use tracing::{debug, info};

/// A configured gRPC server, ready to serve.
///
/// Produced by [`RpcServerBuilder::build`](super::RpcServerBuilder::build).
/// Registrars receive `&mut RpcServer` and attach generated tonic services to
/// it; after `build` returns the handle only needs a listener.
pub struct RpcServer {
    server: Server,
    routes: RoutesBuilder,
    services: Vec<String>,
    streaming_methods: HashSet<String>,
    unary: Option<SharedInterceptor>,
    stream: Option<SharedInterceptor>,
    limits: MessageLimits,
    health: Option<HealthReporter>,
    secure: bool,
}

impl RpcServer {
    pub(crate) fn new(
        server: Server,
        limits: MessageLimits,
        unary: Option<SharedInterceptor>,
        stream: Option<SharedInterceptor>,
        secure: bool,
    ) -> Self {
        Self {
            server,
            routes: RoutesBuilder::default(),
            services: Vec::new(),
            streaming_methods: HashSet::new(),
            unary,
            stream,
            limits,
            health: None,
            secure,
        }
    }

    /// Attach a service whose methods are all unary.
    pub fn add_service<S>(&mut self, service: S) -> Result<(), AttachError>
    where
        S: Service<http::Request<Body>, Response = http::Response<Body>, Error = Infallible>
            + NamedService
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        validate_service_name(S::NAME)?;
        if self.services.iter().any(|name| name == S::NAME) {
            return Err(AttachError::DuplicateService(S::NAME.to_string()));
        }

        self.routes.add_service(service);
        self.services.push(S::NAME.to_string());
        debug!(service = S::NAME, "gRPC service attached");
        Ok(())
    }

    /// Attach a service and mark the named methods as streaming, so calls to
    /// them run through the stream interceptor chain.
    pub fn add_streaming_service<S>(
        &mut self,
        service: S,
        streaming_methods: &[&str],
    ) -> Result<(), AttachError>
    where
        S: Service<http::Request<Body>, Response = http::Response<Body>, Error = Infallible>
            + NamedService
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        if streaming_methods.iter().any(|method| method.is_empty()) {
            return Err(AttachError::InvalidServiceName {
                name: S::NAME.to_string(),
                reason: "streaming method names must not be empty",
            });
        }

        self.add_service(service)?;
        self.streaming_methods.extend(
            streaming_methods
                .iter()
                .map(|method| format!("/{}/{}", S::NAME, method)),
        );
        Ok(())
    }

    /// Message size limits registrars should apply to generated services.
    pub fn limits(&self) -> MessageLimits {
        self.limits
    }

    /// Names of attached services, in attachment order.
    pub fn services(&self) -> &[String] {
        &self.services
    }

    pub fn is_streaming(&self, full_method: &str) -> bool {
        self.streaming_methods.contains(full_method)
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Reporter for the standard health service, when enabled.
    pub fn health_reporter(&self) -> Option<&HealthReporter> {
        self.health.as_ref()
    }

    pub(crate) fn set_health_reporter(&mut self, reporter: HealthReporter) {
        self.health = Some(reporter);
    }

    /// Mark every attached service, and the empty service name used by
    /// generic probes, as SERVING. No-op without a health service.
    pub async fn mark_serving(&self) {
        if let Some(reporter) = &self.health {
            report_serving(reporter, &self.services).await;
        }
    }

    fn interceptor_layer(&self) -> InterceptorLayer {
        InterceptorLayer::new(
            self.unary.clone(),
            self.stream.clone(),
            self.streaming_methods.clone(),
        )
    }

    /// The routed services wrapped in the interceptor chains, without any
    /// transport. Useful for in-process dispatch.
    pub fn into_service(self) -> InterceptorService<Routes> {
        let layer = self.interceptor_layer();
        layer.layer(self.routes.routes())
    }
}

impl fmt::Debug for RpcServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcServer")
            .field("services", &self.services)
            .field("streaming_methods", &self.streaming_methods)
            .field("limits", &self.limits)
            .field("unary_interceptors", &self.unary.is_some())
            .field("stream_interceptors", &self.stream.is_some())
            .field("health", &self.health.is_some())
            .field("secure", &self.secure)
            .finish()
    }
}

#[async_trait]
impl Serve for RpcServer {
    type Error = tonic::transport::Error;

    async fn serve(self, listener: TcpListener) -> Result<(), Self::Error> {
        let layer = self.interceptor_layer();
        let RpcServer {
            server,
            routes,
            services,
            health,
            secure,
            ..
        } = self;

        if let Some(reporter) = &health {
            report_serving(reporter, &services).await;
        }

        info!(
            addr = ?listener.local_addr().ok(),
            services = ?services,
            tls = secure,
            "gRPC server starting"
        );

        let mut server = server.layer(layer);
        server
            .add_routes(routes.routes())
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
    }
}

async fn report_serving(reporter: &HealthReporter, services: &[String]) {
    for service in services {
        reporter
            .set_service_status(service.as_str(), ServingStatus::Serving)
            .await;
    }
    reporter.set_service_status("", ServingStatus::Serving).await;

    debug!(services = ?services, "Services marked as serving");
}

fn validate_service_name(name: &str) -> Result<(), AttachError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains('/') {
        "name must not contain '/'"
    } else if name.chars().any(char::is_whitespace) {
        "name must not contain whitespace"
    } else if name.starts_with('.') || name.ends_with('.') || name.contains("..") {
        "package segments must not be empty"
    } else {
        return Ok(());
    };

    Err(AttachError::InvalidServiceName {
        name: name.to_string(),
        reason,
    })
}
