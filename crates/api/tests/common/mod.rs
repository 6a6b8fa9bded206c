#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;
use watches_api::config::{CorsOrigins, Environment, LogFormat, ServerConfig};
use watches_api::diagnostics;
use watches_api::router::build_app_router;
use watches_api::state::AppState;
use watches_core::watch::{MemoryWatchStore, WatchStore};
use watches_db::DbConfig;

/// Build a test `ServerConfig` with safe defaults.
///
/// Rate limiting is disabled (`throttle_limit = 0`) so tests that issue many
/// requests are not cut off; the database settings are never used.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: Environment::Test,
        cors_origins: CorsOrigins::Any,
        request_timeout_secs: 30,
        throttle_ttl_secs: 60,
        throttle_limit: 0,
        max_page_limit: None,
        log_format: LogFormat::Pretty,
        log_dir: None,
        db: DbConfig::new("postgres://localhost/unused"),
    }
}

/// Build the full application router over an in-memory store.
///
/// Uses the same [`build_app_router`] as the binary, so every test exercises
/// the production middleware stack.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(MemoryWatchStore::new()), test_config())
}

pub fn build_test_app_with(store: Arc<dyn WatchStore>, config: ServerConfig) -> Router {
    let state = AppState::new(store, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, json).await
}

pub async fn patch_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, json).await
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    json: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json).unwrap()))
        .unwrap();
    send(app, request).await
}

/// Read the full response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid create payload.
pub fn apple_watch() -> serde_json::Value {
    serde_json::json!({
        "manufacturer": "apple",
        "model": "watch series 6",
        "bracelet_color": "Blue",
        "launch_date": "2020-09-18",
        "price": "399.99",
        "price_currency": "usd"
    })
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture diagnostic reports emitted on the current thread until the guard
/// is dropped. `#[tokio::test]` runs on a single thread, so handler output is
/// included.
pub fn capture_diagnostics() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(EnvFilter::new(format!("{}=trace", diagnostics::TARGET)))
        .with_writer(move || writer.clone())
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}
