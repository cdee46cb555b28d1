//! JSON envelope sent to the analysis API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use discovery_core::types::ScanResult;

/// Source tag identifying this service to the analysis API.
pub const SOURCE_TAG: &str = "discovery-os";

/// Service tier tag attached to every forwarded result.
pub const OS_TIER: &str = "free";

/// Body of `POST /discovery/analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzePayload<'a> {
    pub url: &'a str,
    pub niche: &'a str,
    pub velocity: f64,
    pub metadata: PayloadMetadata,
}

#[derive(Debug, Serialize)]
pub struct PayloadMetadata {
    pub source: &'static str,
    /// RFC 3339 UTC timestamp of when the result was forwarded.
    pub timestamp: String,
    pub os_tier: &'static str,
}

impl<'a> AnalyzePayload<'a> {
    pub fn new(result: &'a ScanResult, sent_at: DateTime<Utc>) -> Self {
        Self {
            url: &result.url,
            niche: &result.niche,
            velocity: result.velocity,
            metadata: PayloadMetadata {
                source: SOURCE_TAG,
                timestamp: sent_at.to_rfc3339(),
                os_tier: OS_TIER,
            },
        }
    }
}
