//! # gRPC Serve
//!
//! Assemble tonic servers from registration pairs instead of hand-written
//! bootstrap code.
//!
//! ## Features
//!
//! - **Typed registration**: `register(registrar, implementation)` checks at
//!   compile time that the implementation fits its registrar
//! - **Interceptor chains**: separate unary and stream chains, first-registered
//!   outermost, with built-in request-id, auth and metrics interceptors
//! - **Capabilities**: TLS, message size limits, extra transport options and
//!   the standard health service
//!
//! ## Quick Start
//!
//! ```ignore
//! use grpc_serve::{RpcServer, RpcServerBuilder, interceptors::*};
//! use serve_core::{AttachError, Serve};
//!
//! fn register_greeter<G: Greeter>(server: &mut RpcServer, greeter: G) -> Result<(), AttachError> {
//!     server.add_service(GreeterServer::new(greeter))
//! }
//!
//! let server = RpcServerBuilder::new()
//!     .register(register_greeter, MyGreeter::default())
//!     .with_unary_interceptor(RequestIdInterceptor::new())
//!     .with_unary_interceptor(AuthInterceptor::bearer("token"))
//!     .build()?;
//!
//! server.serve(listener).await?;
//! ```

pub mod interceptors;
pub mod server;

pub use server::{
    DEFAULT_MAX_RECV_MSG_SIZE, DEFAULT_MAX_SEND_MSG_SIZE, MessageLimits, RpcServer,
    RpcServerBuilder, ServerOption, UNBOUNDED_MSG_SIZE,
};

pub use interceptors::{
    AuthInterceptor, CallInfo, ComposedInterceptor, Interceptor, MetricsInterceptor, Next,
    RequestIdInterceptor, chain_interceptors, compose_interceptors,
};

pub use serve_core::{AttachError, BuildError, ConfigurationError, RegistrationError, Serve};
