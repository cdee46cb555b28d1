//! `discovery-api` -- concurrent niche discovery service.
//!
//! Scans batches of niches on a bounded worker pool and forwards every
//! result to the downstream analysis API in the background. See
//! [`ServerConfig::from_env`] for the environment variables it reads.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use discovery_api::config::ServerConfig;
use discovery_api::router::build_app_router;
use discovery_api::state::AppState;
use discovery_bridge::client::AnalysisBridge;
use discovery_bridge::forwarder::Forwarder;
use discovery_core::pool::ScanPool;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "discovery_api=debug,discovery_core=debug,discovery_bridge=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        analysis_api_url = %config.analysis_api_url,
        max_workers = config.max_workers,
        "Loaded server configuration",
    );

    // --- Forwarding bridge ---
    let bridge = match AnalysisBridge::new(config.bridge_config()) {
        Ok(bridge) => Arc::new(bridge),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build analysis bridge HTTP client");
            std::process::exit(1);
        }
    };
    let forwarder = Forwarder::new(bridge);

    // --- App state ---
    let shutdown = CancellationToken::new();
    let state = AppState {
        config: Arc::new(config.clone()),
        pool: ScanPool::new(Arc::new(config.scanner()), config.max_workers),
        forwarder: forwarder.clone(),
        shutdown: shutdown.clone(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(config.host, config.port);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind listening socket");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "Discovery engine listening");

    let grace = config.shutdown_timeout();
    let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        // Bound the HTTP drain: dispatches still running after the grace
        // period are cancelled.
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            shutdown.cancel();
        });
    });

    if let Err(e) = serve.await {
        tracing::error!(error = %e, "Server error");
    }

    // --- Post-shutdown cleanup ---
    tracing::info!(
        in_flight = forwarder.in_flight(),
        "Server stopped accepting connections, draining forwards",
    );
    forwarder.shutdown(grace).await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
