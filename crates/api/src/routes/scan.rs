use axum::routing::post;
use axum::Router;

use crate::handlers::scan;
use crate::state::AppState;

/// Mount the scan route.
pub fn router() -> Router<AppState> {
    Router::new().route("/scan", post(scan::start_scan))
}
