//! # HTTP Serve
//!
//! Assemble an axum server from a route table and a middleware stack.
//!
//! ## Modules
//!
//! - **[`middleware`]**: security headers and request tracing
//! - **[`timeouts`]**: read/write/idle connection timeouts
//!
//! ## Quick Start
//!
//! ```ignore
//! use http_serve::{HttpServerBuilder, middleware::security_headers};
//! use serve_core::Serve;
//!
//! let server = HttpServerBuilder::new()
//!     .with_middleware(axum::middleware::from_fn(security_headers))
//!     .handle_func("/hello", || async { "Hello, world!" })?
//!     .build();
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! server.serve(listener).await?;
//! ```

mod builder;
mod pattern;
mod server;
mod tls;

pub mod middleware;
pub mod timeouts;

pub use builder::HttpServerBuilder;
pub use server::HttpServer;
pub use timeouts::{
    DEFAULT_IDLE_TIMEOUT, DEFAULT_READ_TIMEOUT, DEFAULT_WRITE_TIMEOUT, HttpTimeouts,
};

pub use serve_core::{ConfigurationError, RouteError, Serve, TlsConfig};
