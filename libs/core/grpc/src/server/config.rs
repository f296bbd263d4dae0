//! Message limits and pass-through transport options.

use std::fmt;
use std::time::Duration;
use tonic::transport::Server;

/// Default maximum size of an outgoing message (4 MiB).
pub const DEFAULT_MAX_SEND_MSG_SIZE: usize = 4 * 1024 * 1024;

/// Default maximum size of an incoming message (4 MiB).
pub const DEFAULT_MAX_RECV_MSG_SIZE: usize = 4 * 1024 * 1024;

/// Sentinel meaning "no limit".
pub const UNBOUNDED_MSG_SIZE: usize = usize::MAX;

/// Per-message size limits handed to registrars.
///
/// Generated tonic servers carry their own limits, so registrars apply these
/// when they wrap an implementation:
///
/// ```ignore
/// let limits = server.limits();
/// let svc = GreeterServer::new(greeter)
///     .max_encoding_message_size(limits.max_send_msg_size)
///     .max_decoding_message_size(limits.max_recv_msg_size);
/// server.add_service(svc)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLimits {
    pub max_send_msg_size: usize,
    pub max_recv_msg_size: usize,
}

impl Default for MessageLimits {
    fn default() -> Self {
        Self {
            max_send_msg_size: DEFAULT_MAX_SEND_MSG_SIZE,
            max_recv_msg_size: DEFAULT_MAX_RECV_MSG_SIZE,
        }
    }
}

impl MessageLimits {
    pub fn is_send_unbounded(&self) -> bool {
        self.max_send_msg_size == UNBOUNDED_MSG_SIZE
    }

    pub fn is_recv_unbounded(&self) -> bool {
        self.max_recv_msg_size == UNBOUNDED_MSG_SIZE
    }
}

/// An extra transport option, applied to the tonic server after the
/// structured settings.
pub struct ServerOption {
    name: &'static str,
    apply: Box<dyn FnOnce(Server) -> Server + Send>,
}

impl ServerOption {
    /// Wrap an arbitrary server customization.
    pub fn custom<F>(name: &'static str, apply: F) -> Self
    where
        F: FnOnce(Server) -> Server + Send + 'static,
    {
        Self {
            name,
            apply: Box::new(apply),
        }
    }

    /// Per-request timeout.
    pub fn timeout(timeout: Duration) -> Self {
        Self::custom("timeout", move |server| server.timeout(timeout))
    }

    /// Limit concurrent requests on each connection.
    pub fn concurrency_limit_per_connection(limit: usize) -> Self {
        Self::custom("concurrency_limit_per_connection", move |server| {
            server.concurrency_limit_per_connection(limit)
        })
    }

    pub fn tcp_nodelay(enabled: bool) -> Self {
        Self::custom("tcp_nodelay", move |server| server.tcp_nodelay(enabled))
    }

    /// HTTP/2 keepalive ping interval.
    pub fn http2_keepalive_interval(interval: Duration) -> Self {
        Self::custom("http2_keepalive_interval", move |server| {
            server.http2_keepalive_interval(Some(interval))
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn apply(self, server: Server) -> Server {
        (self.apply)(server)
    }
}

impl fmt::Debug for ServerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServerOption").field(&self.name).finish()
    }
}
