use crate::tls::TlsFiles;
use crate::{env_or_default, env_parse, ConfigError, FromEnv};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Server configuration for the HTTP endpoint
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub idle_timeout: Duration,
    pub tls: Option<TlsFiles>,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn secs(key: &str, default: u64) -> Result<Duration, ConfigError> {
    match env_parse(key, default)? {
        0 => Err(ConfigError::Invalid {
            key: key.to_string(),
            reason: "timeout must be at least one second",
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - HOST: defaults to Ipv4Addr::UNSPECIFIED (0.0.0.0 - all interfaces)
    /// - PORT: defaults to 8080
    /// - HTTP_READ_TIMEOUT_SECS / HTTP_WRITE_TIMEOUT_SECS / HTTP_IDLE_TIMEOUT_SECS:
    ///   default to 5 / 10 / 15
    /// - TLS_CERT_FILE + TLS_KEY_FILE: optional
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse("PORT", 8080)?;

        Ok(Self {
            host,
            port,
            read_timeout: secs("HTTP_READ_TIMEOUT_SECS", 5)?,
            write_timeout: secs("HTTP_WRITE_TIMEOUT_SECS", 10)?,
            idle_timeout: secs("HTTP_IDLE_TIMEOUT_SECS", 15)?,
            tls: TlsFiles::from_env_optional()?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(15),
            tls: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 7] = [
        "HOST",
        "PORT",
        "HTTP_READ_TIMEOUT_SECS",
        "HTTP_WRITE_TIMEOUT_SECS",
        "HTTP_IDLE_TIMEOUT_SECS",
        "TLS_CERT_FILE",
        "TLS_KEY_FILE",
    ];

    #[test]
    fn test_server_config_from_env_with_defaults() {
        temp_env::with_vars_unset(KEYS, || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.host, "0.0.0.0");
            assert_eq!(config.port, 8080);
            assert_eq!(config.address(), "0.0.0.0:8080");
            assert_eq!(config.read_timeout, Duration::from_secs(5));
            assert_eq!(config.write_timeout, Duration::from_secs(10));
            assert_eq!(config.idle_timeout, Duration::from_secs(15));
            assert!(config.tls.is_none());
        });
    }

    #[test]
    fn test_server_config_from_env_with_custom_values() {
        temp_env::with_vars(
            [
                ("HOST", Some("127.0.0.1")),
                ("PORT", Some("3000")),
                ("HTTP_READ_TIMEOUT_SECS", None),
                ("HTTP_WRITE_TIMEOUT_SECS", Some("30")),
                ("TLS_CERT_FILE", None),
                ("TLS_KEY_FILE", None),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.address(), "127.0.0.1:3000");
                assert_eq!(config.write_timeout, Duration::from_secs(30));
                assert_eq!(config.read_timeout, Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn test_server_config_from_env_invalid_port() {
        temp_env::with_var("PORT", Some("not_a_number"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }

    #[test]
    fn test_server_config_from_env_port_out_of_range() {
        temp_env::with_var("PORT", Some("99999"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }

    #[test]
    fn test_server_config_from_env_zero_timeout() {
        temp_env::with_var("HTTP_READ_TIMEOUT_SECS", Some("0"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "HTTP_READ_TIMEOUT_SECS"));
        });
    }

    #[test]
    fn test_server_config_from_env_invalid_timeout() {
        temp_env::with_var("HTTP_IDLE_TIMEOUT_SECS", Some("-1"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("HTTP_IDLE_TIMEOUT_SECS"));
        });
    }

    #[test]
    fn test_server_config_new() {
        let config = ServerConfig::new("192.168.1.1".to_string(), 5000);
        assert_eq!(config.address(), "192.168.1.1:5000");
        assert_eq!(config.write_timeout, Duration::from_secs(10));
    }
}
