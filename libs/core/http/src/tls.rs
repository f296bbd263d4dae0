//! Conversion of [`TlsConfig`] into a rustls acceptor config.

use axum_server::tls_rustls::RustlsConfig;
use rustls::crypto::{CryptoProvider, aws_lc_rs};
use rustls::pki_types::CertificateDer;
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};
use serve_core::{ConfigurationError, TlsConfig};
use std::sync::Arc;

fn tls_error(err: impl std::fmt::Display) -> ConfigurationError {
    ConfigurationError::Tls(err.to_string())
}

fn parse_certs(mut pem: &[u8]) -> Result<Vec<CertificateDer<'static>>, ConfigurationError> {
    let certs = rustls_pemfile::certs(&mut pem)
        .collect::<Result<Vec<_>, _>>()
        .map_err(tls_error)?;
    if certs.is_empty() {
        return Err(tls_error("no certificates found in PEM data"));
    }
    Ok(certs)
}

/// Parse the PEM material and build an acceptor config advertising h2 and
/// http/1.1.
pub(crate) fn rustls_config(tls: &TlsConfig) -> Result<RustlsConfig, ConfigurationError> {
    tls.validate()?;

    let certs = parse_certs(tls.cert_chain())?;
    let mut key_pem = tls.private_key();
    let key = rustls_pemfile::private_key(&mut key_pem)
        .map_err(tls_error)?
        .ok_or_else(|| tls_error("no private key found in PEM data"))?;

    let provider: Arc<CryptoProvider> = Arc::new(aws_lc_rs::default_provider());
    let builder = ServerConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .map_err(tls_error)?;

    let builder = match tls.client_ca() {
        Some(ca) => {
            let mut roots = RootCertStore::empty();
            for cert in parse_certs(ca)? {
                roots.add(cert).map_err(tls_error)?;
            }
            let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider)
                .build()
                .map_err(tls_error)?;
            builder.with_client_cert_verifier(verifier)
        }
        None => builder.with_no_client_auth(),
    };

    let mut config = builder.with_single_cert(certs, key).map_err(tls_error)?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(RustlsConfig::from_config(Arc::new(config)))
}
