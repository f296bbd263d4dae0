//! gRPC server assembly.
//!
//! [`RpcServerBuilder`] collects registration pairs and capabilities and turns
//! them into an [`RpcServer`] handle:
//!
//! ```ignore
//! use grpc_serve::server::{RpcServerBuilder, ServerOption};
//! use serve_core::Serve;
//! use std::time::Duration;
//!
//! let server = RpcServerBuilder::new()
//!     .register(register_greeter, MyGreeter::default())
//!     .with_max_recv_msg_size(16 * 1024 * 1024)
//!     .with_option(ServerOption::timeout(Duration::from_secs(30)))
//!     .with_health_service()
//!     .build()?;
//!
//! server.serve(TcpListener::bind("[::1]:50051").await?).await?;
//! ```

mod builder;
mod config;
mod handle;

pub use builder::RpcServerBuilder;
pub use config::{
    DEFAULT_MAX_RECV_MSG_SIZE, DEFAULT_MAX_SEND_MSG_SIZE, MessageLimits, ServerOption,
    UNBOUNDED_MSG_SIZE,
};
pub use handle::RpcServer;
