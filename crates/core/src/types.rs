//! Scan data model: niches in, one [`ScanResult`] out per niche.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Niches scanned when a request supplies none.
pub const DEFAULT_NICHES: [&str; 3] = ["AI", "Fitness", "Motivation"];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One unit of scan work: a single niche waiting to be claimed by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    niche: String,
}

impl ScanRequest {
    pub fn new(niche: impl Into<String>) -> Self {
        Self {
            niche: niche.into(),
        }
    }

    pub fn niche(&self) -> &str {
        &self.niche
    }
}

/// Outcome of scanning one niche.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub niche: String,
    pub velocity: f64,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Producer / input helpers
// ---------------------------------------------------------------------------

/// Turn a niche list into scan work items, preserving input order.
///
/// Duplicate niches each produce their own request.
pub fn scan_requests(niches: Vec<String>) -> impl Iterator<Item = ScanRequest> {
    niches.into_iter().map(ScanRequest::new)
}

/// Return `niches`, or [`DEFAULT_NICHES`] when the list is missing or empty.
pub fn niches_or_default(niches: Option<Vec<String>>) -> Vec<String> {
    match niches {
        Some(list) if !list.is_empty() => list,
        _ => DEFAULT_NICHES.iter().map(|n| n.to_string()).collect(),
    }
}

/// Validate a batch of niches: each must contain at least one
/// non-whitespace character. Length and content are otherwise opaque.
pub fn validate_niches(niches: &[String]) -> Result<(), CoreError> {
    for (i, niche) in niches.iter().enumerate() {
        if niche.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Niche at index {i} must not be blank"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
