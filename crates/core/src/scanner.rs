//! Pluggable scan leaf.
//!
//! The worker pool only depends on the [`Scanner`] trait. The service
//! currently ships [`SimulatedScanner`], a stand-in that derives a
//! velocity from the niche and waits for a length-proportional delay
//! instead of fetching anything over the network.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::types::ScanResult;

/// Lowest velocity [`SimulatedScanner`] can report.
pub const MIN_VELOCITY: f64 = 0.85;

/// Highest velocity [`SimulatedScanner`] can report.
pub const MAX_VELOCITY: f64 = 1.25;

/// Velocity added per length bucket.
const VELOCITY_STEP: f64 = 0.1;

/// Number of length buckets (`len % VELOCITY_BUCKETS`).
const VELOCITY_BUCKETS: usize = 5;

/// Fixed part of the simulated scan latency.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Simulated scan latency added per byte of niche.
pub const DEFAULT_PER_CHAR_DELAY: Duration = Duration::from_millis(100);

const RESULT_URL_PREFIX: &str = "https://platform.com/v/";

/// Scans a single niche.
///
/// Infallible: every call produces exactly one result. Implementations
/// must be safe to call from many workers at once.
#[async_trait]
pub trait Scanner: Send + Sync {
    async fn scan(&self, niche: &str) -> ScanResult;
}

/// Stand-in scanner with deterministic velocity and simulated latency.
#[derive(Debug, Clone)]
pub struct SimulatedScanner {
    base_delay: Duration,
    per_char_delay: Duration,
}

impl SimulatedScanner {
    pub fn new(base_delay: Duration, per_char_delay: Duration) -> Self {
        Self {
            base_delay,
            per_char_delay,
        }
    }

    /// A scanner that returns immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// How long a scan of `niche` is made to take.
    pub fn latency_for(&self, niche: &str) -> Duration {
        let len = u32::try_from(niche.len()).unwrap_or(u32::MAX);
        self.base_delay
            .saturating_add(self.per_char_delay.saturating_mul(len))
    }
}

impl Default for SimulatedScanner {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DELAY, DEFAULT_PER_CHAR_DELAY)
    }
}

#[async_trait]
impl Scanner for SimulatedScanner {
    async fn scan(&self, niche: &str) -> ScanResult {
        tracing::debug!(niche, "Starting scan");

        let latency = self.latency_for(niche);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        ScanResult {
            niche: niche.to_string(),
            velocity: velocity_for(niche),
            url: result_url(),
        }
    }
}

/// Velocity derived from niche length: `0.85 + 0.1 * (len % 5)`.
pub fn velocity_for(niche: &str) -> f64 {
    MIN_VELOCITY + VELOCITY_STEP * (niche.len() % VELOCITY_BUCKETS) as f64
}

fn result_url() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{RESULT_URL_PREFIX}{nanos}")
}
