//! # Hello
//!
//! A greeting service served over both builders.
//!
//! - `hello-grpc` hosts `hello.v1.HelloService` with health checks
//! - `hello-http` hosts `GET /v1/hello?name=...`
//!
//! Both binaries read their listen address, message limits and optional
//! TLS files from the environment (see `core_config`).

pub mod generated;

use axum::Json;
use axum::extract::Query;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use core_config::tls::TlsFiles;
use eyre::WrapErr;
use grpc_serve::{AttachError, RpcServer};
use serde::{Deserialize, Serialize};
use serve_core::TlsConfig;
use tonic::{Request, Response as GrpcResponse, Status};
use tracing::debug;

pub use generated::hello::v1::hello_service_server::{HelloService, HelloServiceServer};
pub use generated::hello::v1::{HelloRequest, HelloResponse};

/// Builds greetings. Callers that give no name are greeted as "world".
#[derive(Clone, Debug, Default)]
pub struct Greeter;

impl Greeter {
    pub fn new() -> Self {
        Self
    }

    pub fn greet(&self, name: &str) -> String {
        let name = name.trim();
        if name.is_empty() {
            "Hello, world!".to_string()
        } else {
            format!("Hello, {name}!")
        }
    }
}

#[tonic::async_trait]
impl HelloService for Greeter {
    async fn hello(
        &self,
        request: Request<HelloRequest>,
    ) -> Result<GrpcResponse<HelloResponse>, Status> {
        let req = request.into_inner();
        debug!(name = %req.name, "Hello called");

        Ok(GrpcResponse::new(HelloResponse {
            greeting: self.greet(&req.name),
        }))
    }
}

/// Attach a [`HelloService`] implementation, honouring the server's
/// message limits.
pub fn register_hello_service<T: HelloService>(
    server: &mut RpcServer,
    service: T,
) -> Result<(), AttachError> {
    let limits = server.limits();
    server.add_service(
        HelloServiceServer::new(service)
            .max_decoding_message_size(limits.max_recv_msg_size)
            .max_encoding_message_size(limits.max_send_msg_size),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct HelloParams {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct HelloBody {
    pub greeting: String,
}

/// `GET /v1/hello`. Any other method answers 405.
pub async fn hello_http(method: Method, Query(params): Query<HelloParams>) -> Response {
    if method != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    Json(HelloBody {
        greeting: Greeter::new().greet(&params.name),
    })
    .into_response()
}

/// Read the PEM files named by `files`.
pub async fn load_tls(files: &TlsFiles) -> eyre::Result<TlsConfig> {
    let cert = tokio::fs::read(&files.cert_file)
        .await
        .wrap_err_with(|| format!("Failed to read {}", files.cert_file.display()))?;
    let key = tokio::fs::read(&files.key_file)
        .await
        .wrap_err_with(|| format!("Failed to read {}", files.key_file.display()))?;

    let mut tls = TlsConfig::new(cert, key);
    if let Some(path) = &files.client_ca_file {
        let ca = tokio::fs::read(path)
            .await
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        tls = tls.with_client_ca(ca);
    }
    Ok(tls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greet() {
        let greeter = Greeter::new();
        assert_eq!(greeter.greet("Ferris"), "Hello, Ferris!");
        assert_eq!(greeter.greet("  "), "Hello, world!");
    }

    #[tokio::test]
    async fn test_load_tls_missing_file() {
        let files = TlsFiles {
            cert_file: "/nonexistent/cert.pem".into(),
            key_file: "/nonexistent/key.pem".into(),
            client_ca_file: None,
        };

        let err = load_tls(&files).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cert.pem"));
    }
}
