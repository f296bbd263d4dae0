use crate::{env_value, ConfigError, FromEnv};
use std::path::PathBuf;

/// Certificate and key file locations.
///
/// Both `TLS_CERT_FILE` and `TLS_KEY_FILE` must be set to enable TLS;
/// setting only one of them is an error. `TLS_CLIENT_CA_FILE` additionally
/// turns on client certificate verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    pub client_ca_file: Option<PathBuf>,
}

impl TlsFiles {
    /// Load from the environment, `None` when TLS is not configured.
    pub fn from_env_optional() -> Result<Option<Self>, ConfigError> {
        let cert = env_value("TLS_CERT_FILE");
        let key = env_value("TLS_KEY_FILE");
        let client_ca_file = env_value("TLS_CLIENT_CA_FILE").map(PathBuf::from);

        match (cert, key) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_file: cert.into(),
                key_file: key.into(),
                client_ca_file,
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar("TLS_KEY_FILE".to_string())),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar("TLS_CERT_FILE".to_string())),
        }
    }
}

impl FromEnv for TlsFiles {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_optional()?
            .ok_or_else(|| ConfigError::MissingEnvVar("TLS_CERT_FILE".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tls_disabled_by_default() {
        temp_env::with_vars_unset(["TLS_CERT_FILE", "TLS_KEY_FILE", "TLS_CLIENT_CA_FILE"], || {
            assert_eq!(TlsFiles::from_env_optional().unwrap(), None);
            assert!(TlsFiles::from_env().is_err());
        });
    }

    #[test]
    fn test_tls_files_from_env() {
        temp_env::with_vars(
            [
                ("TLS_CERT_FILE", Some("/etc/tls/cert.pem")),
                ("TLS_KEY_FILE", Some("/etc/tls/key.pem")),
                ("TLS_CLIENT_CA_FILE", None),
            ],
            || {
                let files = TlsFiles::from_env().unwrap();
                assert_eq!(files.cert_file, PathBuf::from("/etc/tls/cert.pem"));
                assert_eq!(files.key_file, PathBuf::from("/etc/tls/key.pem"));
                assert_eq!(files.client_ca_file, None);
            },
        );
    }

    #[test]
    fn test_half_configured_tls_is_an_error() {
        temp_env::with_vars(
            [
                ("TLS_CERT_FILE", Some("/etc/tls/cert.pem")),
                ("TLS_KEY_FILE", None),
            ],
            || {
                let err = TlsFiles::from_env_optional().unwrap_err();
                assert!(err.to_string().contains("TLS_KEY_FILE"));
            },
        );
    }
}
