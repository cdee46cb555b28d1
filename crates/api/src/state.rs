use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use discovery_bridge::forwarder::Forwarder;
use discovery_core::pool::ScanPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Bounded scan worker pool.
    pub pool: ScanPool,
    /// Fire-and-forget forwarding of results to the analysis API.
    pub forwarder: Forwarder,
    /// Cancelled when shutdown outlasts its grace period; aborts in-flight dispatches.
    pub shutdown: CancellationToken,
}
