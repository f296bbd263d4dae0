use crate::tls::TlsFiles;
use crate::{env_or_default, env_parse, ConfigError, FromEnv};

/// 4 MiB, the default per-message limit in both directions
pub const DEFAULT_MAX_MSG_SIZE: usize = 4 * 1024 * 1024;

/// Configuration for the gRPC endpoint.
#[derive(Clone, Debug)]
pub struct GrpcConfig {
    /// Host to bind to (default: [::1] for IPv6 localhost)
    pub host: String,
    /// Port to listen on (default: 50051)
    pub port: u16,
    pub max_send_msg_size: usize,
    pub max_recv_msg_size: usize,
    pub tls: Option<TlsFiles>,
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            host: "[::1]".to_string(),
            port: 50051,
            max_send_msg_size: DEFAULT_MAX_MSG_SIZE,
            max_recv_msg_size: DEFAULT_MAX_MSG_SIZE,
            tls: None,
        }
    }
}

impl GrpcConfig {
    /// Get the address string (for binding and logging).
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for GrpcConfig {
    /// Reads:
    /// - `GRPC_HOST` (default: [::1])
    /// - `GRPC_PORT` (default: 50051)
    /// - `GRPC_MAX_SEND_MSG_SIZE` / `GRPC_MAX_RECV_MSG_SIZE` (default: 4 MiB)
    /// - `TLS_CERT_FILE` + `TLS_KEY_FILE` (optional)
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or_default("GRPC_HOST", "[::1]"),
            port: env_parse("GRPC_PORT", 50051)?,
            max_send_msg_size: env_parse("GRPC_MAX_SEND_MSG_SIZE", DEFAULT_MAX_MSG_SIZE)?,
            max_recv_msg_size: env_parse("GRPC_MAX_RECV_MSG_SIZE", DEFAULT_MAX_MSG_SIZE)?,
            tls: TlsFiles::from_env_optional()?,
        })
    }
}
