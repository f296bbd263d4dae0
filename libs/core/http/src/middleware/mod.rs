//! Ready-made middleware for [`HttpServerBuilder::with_middleware`](crate::HttpServerBuilder::with_middleware).
//!
//! ```ignore
//! use http_serve::middleware::{request_trace_layer, security_headers};
//!
//! let server = HttpServerBuilder::new()
//!     .with_middleware(request_trace_layer())
//!     .with_middleware(axum::middleware::from_fn(security_headers))
//!     .handle_func("/", index)?
//!     .build();
//! ```

pub mod security;
pub mod trace;

pub use security::{security_headers, strict_transport_security};
pub use trace::{RequestTraceLayer, request_trace_layer};
