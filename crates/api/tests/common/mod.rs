#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request, Response, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use discovery_api::config::ServerConfig;
use discovery_api::router::build_app_router;
use discovery_api::state::AppState;
use discovery_bridge::client::AnalysisBridge;
use discovery_bridge::config::BridgeConfig;
use discovery_bridge::forwarder::Forwarder;
use discovery_core::pool::ScanPool;
use discovery_core::scanner::{Scanner, SimulatedScanner};

/// Build a test `ServerConfig` with safe defaults.
///
/// Scans are instant and forwards target `analysis_api_url`.
pub fn test_config(analysis_api_url: &str) -> ServerConfig {
    ServerConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        analysis_api_url: analysis_api_url.to_string(),
        max_workers: 50,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        forward_timeout_secs: 5,
        shutdown_timeout_secs: 5,
        scan_base_delay_ms: 0,
        scan_per_char_delay_ms: 0,
    }
}

/// Everything a test needs to drive the app and inspect its side channels.
pub struct TestApp {
    pub router: Router,
    pub forwarder: Forwarder,
    pub shutdown: CancellationToken,
}

/// Build the full application router backed by the simulated scanner.
pub fn build_test_app(analysis_api_url: &str) -> TestApp {
    let config = test_config(analysis_api_url);
    let scanner = Arc::new(config.scanner());
    build_test_app_with(config, scanner)
}

/// Build the full application router with a custom scanner.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise
/// the production middleware stack.
pub fn build_test_app_with(config: ServerConfig, scanner: Arc<dyn Scanner>) -> TestApp {
    let bridge = AnalysisBridge::new(
        BridgeConfig::new(config.analysis_api_url.clone())
            .with_timeout(Duration::from_secs(config.forward_timeout_secs)),
    )
    .expect("build analysis bridge");
    let forwarder = Forwarder::new(Arc::new(bridge));
    let shutdown = CancellationToken::new();

    let state = AppState {
        config: Arc::new(config.clone()),
        pool: ScanPool::new(scanner, config.max_workers),
        forwarder: forwarder.clone(),
        shutdown: shutdown.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        forwarder,
        shutdown,
    }
}

/// A scanner that returns instantly, for tests that do not care about latency.
pub fn instant_scanner() -> Arc<dyn Scanner> {
    Arc::new(SimulatedScanner::instant())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Mock analysis API
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct MockState {
    received: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
    stall: bool,
}

/// Downstream analysis API stand-in bound to an ephemeral local port.
pub struct MockAnalysisApi {
    pub base_url: String,
    received: Arc<Mutex<Vec<Value>>>,
}

impl MockAnalysisApi {
    /// Responds to every forward with `status`.
    pub async fn responding(status: StatusCode) -> Self {
        Self::spawn(status, false).await
    }

    /// Records every forward but never responds.
    pub async fn stalled() -> Self {
        Self::spawn(StatusCode::OK, true).await
    }

    pub async fn received(&self) -> Vec<Value> {
        self.received.lock().await.clone()
    }

    async fn spawn(status: StatusCode, stall: bool) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/discovery/analyze", post(analyze))
            .with_state(MockState {
                received: Arc::clone(&received),
                status,
                stall,
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock analysis API");
        let addr = listener.local_addr().expect("mock address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server runs");
        });

        Self {
            base_url: format!("http://{addr}"),
            received,
        }
    }
}

async fn analyze(State(state): State<MockState>, Json(body): Json<Value>) -> StatusCode {
    state.received.lock().await.push(body);
    if state.stall {
        std::future::pending::<()>().await;
    }
    state.status
}
