use std::time::Duration;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://api:8000";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ANALYZE_PATH: &str = "/discovery/analyze";

/// Immutable configuration for [`AnalysisBridge`](crate::client::AnalysisBridge).
///
/// Built once at startup and injected; the bridge never reads the
/// environment itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    base_url: String,
    /// Timeout applied to each forward request.
    pub timeout: Duration,
}

impl BridgeConfig {
    /// Create a config for `base_url`. Trailing slashes are trimmed.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the analyze endpoint.
    pub fn analyze_url(&self) -> String {
        format!("{}{ANALYZE_PATH}", self.base_url)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
