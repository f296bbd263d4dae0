use crate::timeouts::HttpTimeouts;
use async_trait::async_trait;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use hyper_util::server::conn::auto::Builder;
use serve_core::Serve;
use std::fmt;
use std::io;
use tokio::net::TcpListener;
use tracing::info;

/// A composed router plus the connection settings it is served with.
#[derive(Clone)]
pub struct HttpServer {
    router: Router,
    patterns: Vec<String>,
    timeouts: HttpTimeouts,
    tls: Option<RustlsConfig>,
}

impl HttpServer {
    pub(crate) fn new(
        router: Router,
        patterns: Vec<String>,
        timeouts: HttpTimeouts,
        tls: Option<RustlsConfig>,
    ) -> Self {
        Self {
            router,
            patterns,
            timeouts,
            tls,
        }
    }

    /// The full request-handling chain, for in-process dispatch.
    pub fn handler(&self) -> Router {
        self.router.clone()
    }

    /// Registered patterns, in first-registration order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn timeouts(&self) -> HttpTimeouts {
        self.timeouts
    }

    pub fn is_secure(&self) -> bool {
        self.tls.is_some()
    }
}

impl fmt::Debug for HttpServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpServer")
            .field("patterns", &self.patterns)
            .field("timeouts", &self.timeouts)
            .field("tls", &self.tls.is_some())
            .finish()
    }
}

/// HTTP/1 gets the header read timeout, which also bounds the wait between
/// keep-alive requests. HTTP/2 gets keep-alive pings every `idle`.
fn apply_timeouts(builder: &mut Builder<TokioExecutor>, timeouts: HttpTimeouts) {
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.read);
    builder
        .http2()
        .timer(TokioTimer::new())
        .keep_alive_interval(Some(timeouts.idle))
        .keep_alive_timeout(timeouts.idle);
}

#[async_trait]
impl Serve for HttpServer {
    type Error = io::Error;

    async fn serve(self, listener: TcpListener) -> Result<(), Self::Error> {
        let addr = listener.local_addr()?;
        info!(
            address = %addr,
            routes = ?self.patterns,
            tls = self.tls.is_some(),
            "HTTP server starting"
        );

        let listener = listener.into_std()?;
        let app = self.router.into_make_service();

        match self.tls {
            Some(tls) => {
                let mut server = axum_server::from_tcp_rustls(listener, tls);
                apply_timeouts(server.http_builder(), self.timeouts);
                server.serve(app).await
            }
            None => {
                let mut server = axum_server::from_tcp(listener);
                apply_timeouts(server.http_builder(), self.timeouts);
                server.serve(app).await
            }
        }
    }
}
