use axum::middleware;
use core_config::server::ServerConfig;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use eyre::WrapErr;
use hello::{hello_http, load_tls};
use http_serve::middleware::{
    request_trace_layer, security_headers, strict_transport_security,
};
use http_serve::{HttpServerBuilder, HttpTimeouts, Serve};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();
    let environment = Environment::from_env();
    init_tracing(&environment);

    let config = ServerConfig::from_env()?;

    let mut builder = HttpServerBuilder::new()
        .with_middleware(request_trace_layer())
        .with_middleware(middleware::from_fn(security_headers));

    if let Some(files) = &config.tls {
        builder = builder
            .with_middleware(middleware::from_fn(strict_transport_security))
            .with_tls(load_tls(files).await?)?;
    }

    let builder = builder
        .with_timeouts(HttpTimeouts::new(
            config.read_timeout,
            config.write_timeout,
            config.idle_timeout,
        ))?
        .handle_func("/v1/hello", hello_http)?;

    let server = builder.build();

    let listener = TcpListener::bind(config.address())
        .await
        .wrap_err_with(|| format!("Failed to listen on {}", config.address()))?;
    info!(address = %listener.local_addr()?, "Listening for HTTP requests");

    server.serve(listener).await.wrap_err("HTTP server failed")?;
    Ok(())
}
