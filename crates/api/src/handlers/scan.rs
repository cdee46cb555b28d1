//! Handler for `POST /scan`.
//!
//! Runs one dispatch cycle over the requested niches, hands every result
//! to the forwarder without waiting on it, and returns the collected
//! results.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use discovery_core::types::{niches_or_default, validate_niches, ScanResult};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Message returned with every completed scan.
pub const SCAN_COMPLETE_MESSAGE: &str = "Concurrent scan completed and sent to AI pipeline";

/// Engine tag returned with every completed scan.
pub const ENGINE_TAG: &str = "tokio-concurrency";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /scan`.
#[derive(Debug, Default, Deserialize)]
pub struct ScanRequestBody {
    /// Niches to scan. Missing, `null`, or empty means the default list.
    #[serde(default)]
    pub niches: Option<Vec<String>>,
}

/// Response body for `POST /scan`.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub message: &'static str,
    pub results: Vec<ScanResult>,
    pub engine: &'static str,
}

/// JSON extractor for [`ScanRequestBody`].
///
/// An empty body is treated as `{}`. Any other body that is not a valid
/// request object is rejected with `400 Bad Request`.
pub struct ScanBody(pub ScanRequestBody);

impl<S> FromRequest<S> for ScanBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Failed to read scan request body");
            AppError::BadRequest("Invalid request body".to_string())
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(ScanRequestBody::default()));
        }

        let Json(body) = Json::<ScanRequestBody>::from_bytes(&bytes).map_err(|e| {
            tracing::debug!(error = %e, "Rejected malformed scan request body");
            AppError::BadRequest("Invalid request body".to_string())
        })?;

        Ok(Self(body))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /scan -- scan niches concurrently and forward each result.
pub async fn start_scan(
    State(state): State<AppState>,
    ScanBody(body): ScanBody,
) -> AppResult<Json<ScanResponse>> {
    let niches = niches_or_default(body.niches);
    validate_niches(&niches)?;

    let dispatch = state.pool.dispatch(niches, &state.shutdown).await?;

    state.forwarder.forward_all(&dispatch.results);
    tracing::info!(
        result_count = dispatch.results.len(),
        worker_count = dispatch.worker_count,
        "Scan results handed to forwarder",
    );

    Ok(Json(ScanResponse {
        message: SCAN_COMPLETE_MESSAGE,
        results: dispatch.results,
        engine: ENGINE_TAG,
    }))
}
