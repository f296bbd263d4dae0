//! Integration tests for the HTTP server builder
//!
//! These tests verify the composed request-handling chain:
//! - Route registration and replacement
//! - Middleware wrapping order
//! - Timeouts and route errors
//! - Serving over a real TCP listener

use axum::body::Body;
use axum::extract::{Path, Request};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::routing::get;
use http_body_util::BodyExt;
use http_serve::middleware::{request_trace_layer, security_headers};
use http_serve::{HttpServerBuilder, HttpTimeouts, RouteError, Serve};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt; // For oneshot()

type Log = Arc<Mutex<Vec<String>>>;

// Helper to read a response body as text
async fn text_body(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get_request(uri: &str) -> Request {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn recording(
    name: &'static str,
    log: Log,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn Future<Output = axum::response::Response> + Send>>
+ Clone
+ Send
+ Sync
+ 'static {
    move |request: Request, next: Next| {
        let log = log.clone();
        Box::pin(async move {
            log.lock().unwrap().push(format!("{name}:in"));
            let response = next.run(request).await;
            log.lock().unwrap().push(format!("{name}:out"));
            response
        })
    }
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn test_last_registration_wins() {
    let app = HttpServerBuilder::new()
        .handle_func("/x", || async { "H1" })
        .unwrap()
        .handle_func("/x", || async { "H2" })
        .unwrap()
        .build()
        .handler();

    let response = app.oneshot(get_request("/x")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response.into_body()).await, "H2");
}

#[tokio::test]
async fn test_handle_accepts_tower_service() {
    let service = tower::service_fn(|_request: Request| async {
        Ok::<_, Infallible>("from a service")
    });
    let app = HttpServerBuilder::new()
        .handle("/svc", service)
        .unwrap()
        .build()
        .handler();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/svc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(text_body(response.into_body()).await, "from a service");
}

#[tokio::test]
async fn test_method_router_and_captures() {
    let app = HttpServerBuilder::new()
        .route(
            "/users/{id}",
            get(|Path(id): Path<String>| async move { format!("user {id}") }),
        )
        .unwrap()
        .route("/users/new", get(|| async { "new user form" }))
        .unwrap()
        .build()
        .handler();

    let response = app.clone().oneshot(get_request("/users/42")).await.unwrap();
    assert_eq!(text_body(response.into_body()).await, "user 42");

    let response = app.clone().oneshot(get_request("/users/new")).await.unwrap();
    assert_eq!(text_body(response.into_body()).await, "new user form");

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/users/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn test_route_errors() {
    assert_eq!(
        HttpServerBuilder::new()
            .handle_func("", || async { "" })
            .unwrap_err(),
        RouteError::Empty
    );
    assert!(matches!(
        HttpServerBuilder::new().handle_func("/files/:name", || async { "" }),
        Err(RouteError::Malformed { .. })
    ));
}

// ============================================================================
// Middleware
// ============================================================================

#[tokio::test]
async fn test_first_registered_middleware_is_outermost() {
    let log = Log::default();
    let handler_log = log.clone();
    let app = HttpServerBuilder::new()
        .with_middleware(middleware::from_fn(recording("A", log.clone())))
        .with_middleware(middleware::from_fn(recording("B", log.clone())))
        .with_middleware(middleware::from_fn(recording("C", log.clone())))
        .handle_func("/", move || {
            let log = handler_log.clone();
            async move {
                log.lock().unwrap().push("handler".to_string());
                "ok"
            }
        })
        .unwrap()
        .build()
        .handler();

    let response = app.oneshot(get_request("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["A:in", "B:in", "C:in", "handler", "C:out", "B:out", "A:out"]
    );
}

#[tokio::test]
async fn test_middleware_wraps_unmatched_routes() {
    let app = HttpServerBuilder::new()
        .with_middleware(request_trace_layer())
        .with_middleware(middleware::from_fn(security_headers))
        .handle_func("/", || async { "ok" })
        .unwrap()
        .build()
        .handler();

    let response = app.oneshot(get_request("/missing")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}

// ============================================================================
// Timeouts
// ============================================================================

#[tokio::test]
async fn test_slow_handler_hits_write_timeout() {
    let app = HttpServerBuilder::new()
        .with_timeouts(HttpTimeouts::new(
            Duration::from_secs(5),
            Duration::from_millis(50),
            Duration::from_secs(15),
        ))
        .unwrap()
        .handle_func("/slow", || async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            "too late"
        })
        .unwrap()
        .build()
        .handler();

    let response = app.oneshot(get_request("/slow")).await.unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}

// ============================================================================
// Serving
// ============================================================================

#[tokio::test]
async fn test_serves_over_tcp() {
    let server = HttpServerBuilder::new()
        .with_middleware(middleware::from_fn(security_headers))
        .handle_func("/hello", || async { "Hello, world!" })
        .unwrap()
        .build();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve(listener));

    let response = reqwest::get(format!("http://{addr}/hello")).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.text().await.unwrap(), "Hello, world!");
}

#[tokio::test]
async fn test_idle_http1_connection_is_closed_after_read_timeout() {
    let server = HttpServerBuilder::new()
        .with_timeouts(HttpTimeouts::new(
            Duration::from_millis(200),
            Duration::from_secs(10),
            Duration::from_secs(15),
        ))
        .unwrap()
        .handle_func("/hello", || async { "Hello, world!" })
        .unwrap()
        .build();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve(listener));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    // HTTP/1.1 keeps the connection open, so EOF only comes from the server
    let mut received = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut received))
        .await
        .expect("idle connection was not closed")
        .unwrap();

    let received = String::from_utf8(received).unwrap();
    assert!(received.starts_with("HTTP/1.1 200 OK"), "{received}");
    assert!(received.ends_with("Hello, world!"), "{received}");
}
