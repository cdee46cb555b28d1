pub mod health;
pub mod scan;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tower_http::timeout::TimeoutLayer;

use crate::state::AppState;

/// Build the service route tree.
///
/// ```text
/// GET  /health      liveness check (bounded by `request_timeout`)
/// POST /scan        concurrent niche scan + forwarding (unbounded)
/// ```
///
/// A scan holds its response until every niche has been scanned, so its
/// duration grows with the batch and is never cut short by a timeout.
pub fn api_routes(request_timeout: Duration) -> Router<AppState> {
    Router::new()
        .merge(health::router().layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        )))
        .merge(scan::router())
}
