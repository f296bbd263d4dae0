//! # Serve Core
//!
//! Contract types shared by the gRPC and HTTP server builders.
//!
//! - **[`Serve`]**: the single operation a built server exposes
//! - **[`TlsConfig`]**: secure-session material handed to either builder
//! - **[`error`]**: the builder error taxonomy
//!
//! ## Example
//!
//! ```ignore
//! use serve_core::Serve;
//! use tokio::net::TcpListener;
//!
//! let server = grpc_serve::RpcServerBuilder::new()
//!     .register(register_greeter, MyGreeter::default())
//!     .build()?;
//!
//! let listener = TcpListener::bind("127.0.0.1:50051").await?;
//! server.serve(listener).await?;
//! ```

pub mod error;
pub mod tls;

use async_trait::async_trait;
use tokio::net::TcpListener;

pub use error::{AttachError, BuildError, ConfigurationError, RegistrationError, RouteError};
pub use tls::TlsConfig;

/// Something that accepts incoming connections.
///
/// Implemented by every server a builder produces. Errors coming out of the
/// transport engine are surfaced through [`Serve::Error`] unchanged.
#[async_trait]
pub trait Serve: Send + Sized {
    /// Error produced by the underlying transport engine.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Accept connections on `listener` until the accept loop fails.
    async fn serve(self, listener: TcpListener) -> Result<(), Self::Error>;
}
