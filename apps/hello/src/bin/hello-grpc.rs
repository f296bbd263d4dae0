use core_config::grpc::GrpcConfig;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use eyre::WrapErr;
use grpc_serve::{MetricsInterceptor, RequestIdInterceptor, RpcServerBuilder, Serve};
use hello::{Greeter, load_tls, register_hello_service};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();
    let environment = Environment::from_env();
    init_tracing(&environment);

    let config = GrpcConfig::from_env()?;

    let mut builder = RpcServerBuilder::new()
        .register(register_hello_service, Greeter::new())
        .with_max_send_msg_size(config.max_send_msg_size)
        .with_max_recv_msg_size(config.max_recv_msg_size)
        .with_unary_interceptor(RequestIdInterceptor::new())
        .with_unary_interceptor(MetricsInterceptor::new())
        .with_stream_interceptor(RequestIdInterceptor::new())
        .with_health_service();

    if let Some(files) = &config.tls {
        builder = builder.with_tls(load_tls(files).await?)?;
    }

    let server = builder.build()?;

    let listener = TcpListener::bind(config.address())
        .await
        .wrap_err_with(|| format!("Failed to listen on {}", config.address()))?;
    info!(address = %listener.local_addr()?, "Listening for gRPC requests");

    server.serve(listener).await.wrap_err("gRPC server failed")?;
    Ok(())
}
