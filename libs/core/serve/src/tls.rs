use crate::error::ConfigurationError;
use std::fmt;

/// Secure-session material for a server endpoint.
///
/// Holds PEM-encoded bytes as produced by whatever loads certificates from
/// disk or a secret store. Both builders convert it into their transport's
/// credential type.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    cert_chain: Vec<u8>,
    private_key: Vec<u8>,
    client_ca: Option<Vec<u8>>,
}

impl TlsConfig {
    /// Create a config from a PEM certificate chain and PEM private key.
    pub fn new(cert_chain: impl Into<Vec<u8>>, private_key: impl Into<Vec<u8>>) -> Self {
        Self {
            cert_chain: cert_chain.into(),
            private_key: private_key.into(),
            client_ca: None,
        }
    }

    /// Require client certificates signed by the given PEM CA bundle.
    pub fn with_client_ca(mut self, client_ca: impl Into<Vec<u8>>) -> Self {
        self.client_ca = Some(client_ca.into());
        self
    }

    pub fn cert_chain(&self) -> &[u8] {
        &self.cert_chain
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    pub fn client_ca(&self) -> Option<&[u8]> {
        self.client_ca.as_deref()
    }

    /// Reject configs that would produce credentials from nothing.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.cert_chain.is_empty() {
            return Err(ConfigurationError::EmptyTls("certificate chain"));
        }
        if self.private_key.is_empty() {
            return Err(ConfigurationError::EmptyTls("private key"));
        }
        if matches!(&self.client_ca, Some(ca) if ca.is_empty()) {
            return Err(ConfigurationError::EmptyTls("client CA bundle"));
        }
        Ok(())
    }
}

impl fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_chain_len", &self.cert_chain.len())
            .field("private_key", &"<redacted>")
            .field("client_auth", &self.client_ca.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_rejected() {
        let result = TlsConfig::default().validate();
        assert_eq!(
            result,
            Err(ConfigurationError::EmptyTls("certificate chain"))
        );
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let config = TlsConfig::new("-----BEGIN CERTIFICATE-----", Vec::new());
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::EmptyTls("private key"))
        );
    }

    #[test]
    fn test_empty_client_ca_is_rejected() {
        let config = TlsConfig::new("cert", "key").with_client_ca(Vec::new());
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::EmptyTls("client CA bundle"))
        );
    }

    #[test]
    fn test_complete_config_is_accepted() {
        let config = TlsConfig::new("cert", "key").with_client_ca("ca");
        assert!(config.validate().is_ok());
        assert_eq!(config.client_ca(), Some(&b"ca"[..]));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let config = TlsConfig::new("cert", "super-secret-key");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
