//! gRPC server builder.

use super::config::{MessageLimits, ServerOption};
use super::handle::RpcServer;
use crate::interceptors::{Interceptor, SharedInterceptor, chain_interceptors};
use serve_core::{AttachError, BuildError, ConfigurationError, RegistrationError, TlsConfig};
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use tonic::transport::{Certificate, Identity, Server, ServerTlsConfig};
use tracing::debug;

type Attach = Box<dyn FnOnce(&mut RpcServer) -> Result<(), AttachError> + Send>;

/// One registrar plus the implementation it will attach.
struct Registration {
    registrar: &'static str,
    implementation: &'static str,
    attach: Attach,
}

/// Collects registrations and capabilities, then builds an [`RpcServer`].
///
/// A registrar is any `FnOnce(&mut RpcServer, S) -> Result<(), AttachError>`.
/// The implementation passed next to it must be exactly the `S` the registrar
/// accepts, so a mismatched pair does not compile.
///
/// The message limits apply to every service on the server. The health
/// service gets them from the builder; a registrar reads them from
/// [`RpcServer::limits`] and sets them on the generated server it attaches.
///
/// ```ignore
/// fn register_greeter<G: Greeter>(server: &mut RpcServer, greeter: G) -> Result<(), AttachError> {
///     let limits = server.limits();
///     server.add_service(
///         GreeterServer::new(greeter)
///             .max_encoding_message_size(limits.max_send_msg_size)
///             .max_decoding_message_size(limits.max_recv_msg_size),
///     )
/// }
///
/// let server = RpcServerBuilder::new()
///     .register(register_greeter, MyGreeter::default())
///     .with_unary_interceptor(RequestIdInterceptor::new())
///     .with_health_service()
///     .build()?;
/// ```
///
/// A pair whose implementation does not fit the registrar is rejected by the
/// compiler:
///
/// ```compile_fail
/// use grpc_serve::{AttachError, RpcServer, RpcServerBuilder};
///
/// fn register_port(_server: &mut RpcServer, _port: u16) -> Result<(), AttachError> {
///     Ok(())
/// }
///
/// let _ = RpcServerBuilder::new().register(register_port, "not a port");
/// ```
///
/// `build` consumes the builder, so it cannot be built twice:
///
/// ```compile_fail
/// use grpc_serve::RpcServerBuilder;
///
/// let builder = RpcServerBuilder::new();
/// let _first = builder.build();
/// let _second = builder.build();
/// ```
#[derive(Default)]
pub struct RpcServerBuilder {
    registrations: Vec<Registration>,
    tls: Option<TlsConfig>,
    limits: MessageLimits,
    unary: Vec<SharedInterceptor>,
    stream: Vec<SharedInterceptor>,
    options: Vec<ServerOption>,
    health: bool,
}

impl RpcServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `implementation` to be attached by `registrar` at build time.
    ///
    /// Registrars run in the order they were registered.
    pub fn register<F, S>(mut self, registrar: F, implementation: S) -> Self
    where
        F: FnOnce(&mut RpcServer, S) -> Result<(), AttachError> + Send + 'static,
        S: Send + 'static,
    {
        self.registrations.push(Registration {
            registrar: type_name::<F>(),
            implementation: type_name::<S>(),
            attach: Box::new(move |server| registrar(server, implementation)),
        });
        self
    }

    /// Serve over TLS. Empty material is rejected here, invalid PEM at build.
    pub fn with_tls(mut self, tls: TlsConfig) -> Result<Self, ConfigurationError> {
        tls.validate()?;
        self.tls = Some(tls);
        Ok(self)
    }

    /// Maximum outgoing message size. The last call wins.
    pub fn with_max_send_msg_size(mut self, size: usize) -> Self {
        self.limits.max_send_msg_size = size;
        self
    }

    /// Maximum incoming message size. The last call wins.
    pub fn with_max_recv_msg_size(mut self, size: usize) -> Self {
        self.limits.max_recv_msg_size = size;
        self
    }

    /// Append to the unary chain. Earlier interceptors wrap later ones.
    pub fn with_unary_interceptor<I: Interceptor>(mut self, interceptor: I) -> Self {
        self.unary.push(Arc::new(interceptor));
        self
    }

    pub fn with_unary_interceptors<I>(mut self, interceptors: I) -> Self
    where
        I: IntoIterator<Item = SharedInterceptor>,
    {
        self.unary.extend(interceptors);
        self
    }

    /// Append to the stream chain. Earlier interceptors wrap later ones.
    pub fn with_stream_interceptor<I: Interceptor>(mut self, interceptor: I) -> Self {
        self.stream.push(Arc::new(interceptor));
        self
    }

    pub fn with_stream_interceptors<I>(mut self, interceptors: I) -> Self
    where
        I: IntoIterator<Item = SharedInterceptor>,
    {
        self.stream.extend(interceptors);
        self
    }

    /// Extra transport option, applied after the structured settings.
    pub fn with_option(mut self, option: ServerOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_options<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = ServerOption>,
    {
        self.options.extend(options);
        self
    }

    /// Expose `grpc.health.v1.Health` and report every registered service as
    /// SERVING once the server starts.
    pub fn with_health_service(mut self) -> Self {
        self.health = true;
        self
    }

    /// Apply all capabilities, then run every registrar in order.
    ///
    /// The first failing registrar aborts the build.
    pub fn build(self) -> Result<RpcServer, BuildError> {
        let mut server = Server::builder();
        if let Some(tls) = &self.tls {
            server = server
                .tls_config(server_tls_config(tls))
                .map_err(|err| ConfigurationError::Tls(err.to_string()))?;
        }
        for option in self.options {
            debug!(option = option.name(), "Applying gRPC server option");
            server = option.apply(server);
        }

        let mut handle = RpcServer::new(
            server,
            self.limits,
            chain_interceptors(self.unary),
            chain_interceptors(self.stream),
            self.tls.is_some(),
        );

        let count = self.registrations.len();
        for (position, registration) in self.registrations.into_iter().enumerate() {
            (registration.attach)(&mut handle).map_err(|source| RegistrationError {
                position,
                registrar: registration.registrar,
                implementation: registration.implementation,
                source,
            })?;
        }

        if self.health {
            let (reporter, service) = tonic_health::server::health_reporter();
            let service = service
                .max_decoding_message_size(self.limits.max_recv_msg_size)
                .max_encoding_message_size(self.limits.max_send_msg_size);
            let implementation = type_name_of(&service);
            handle
                .add_streaming_service(service, &["Watch"])
                .map_err(|source| RegistrationError {
                    position: count,
                    registrar: "with_health_service",
                    implementation,
                    source,
                })?;
            handle.set_health_reporter(reporter);
        }

        debug!(services = ?handle.services(), "gRPC server built");
        Ok(handle)
    }
}

fn type_name_of<T>(_: &T) -> &'static str {
    type_name::<T>()
}

fn server_tls_config(tls: &TlsConfig) -> ServerTlsConfig {
    let identity = Identity::from_pem(tls.cert_chain(), tls.private_key());
    let config = ServerTlsConfig::new().identity(identity);
    match tls.client_ca() {
        Some(ca) => config.client_ca_root(Certificate::from_pem(ca)),
        None => config,
    }
}

impl fmt::Debug for RpcServerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registrations: Vec<_> = self
            .registrations
            .iter()
            .map(|r| (r.registrar, r.implementation))
            .collect();
        f.debug_struct("RpcServerBuilder")
            .field("registrations", &registrations)
            .field("tls", &self.tls)
            .field("limits", &self.limits)
            .field("unary_interceptors", &self.unary.len())
            .field("stream_interceptors", &self.stream.len())
            .field("options", &self.options)
            .field("health", &self.health)
            .finish()
    }
}
