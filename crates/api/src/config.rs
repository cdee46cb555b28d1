use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::time::Duration;

use discovery_bridge::config::{BridgeConfig, DEFAULT_BASE_URL};
use discovery_core::pool::DEFAULT_MAX_WORKERS;
use discovery_core::scanner::{SimulatedScanner, DEFAULT_BASE_DELAY, DEFAULT_PER_CHAR_DELAY};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running inside the compose
/// network. Values that fail to parse fall back to their default.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Base URL of the downstream analysis API (default: `http://api:8000`).
    pub analysis_api_url: String,
    /// Upper bound on concurrent scan workers per dispatch (default: `50`).
    pub max_workers: usize,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Timeout for `/health` requests in seconds (default: `30`).
    /// `/scan` is never timed out.
    pub request_timeout_secs: u64,
    /// Timeout for each forward to the analysis API in seconds (default: `10`).
    pub forward_timeout_secs: u64,
    /// How long shutdown waits for in-flight forwards, in seconds (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Simulated scan latency, fixed part (default: `500`).
    pub scan_base_delay_ms: u64,
    /// Simulated scan latency per niche byte (default: `100`).
    pub scan_per_char_delay_ms: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                       |
    /// |--------------------------|-----------------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                                     |
    /// | `PORT`                   | `8080`                                        |
    /// | `PYTHON_API_URL`         | `http://api:8000`                             |
    /// | `MAX_WORKERS`            | `50`                                          |
    /// | `CORS_ORIGINS`           | `http://localhost:3000,http://localhost:8080` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                          |
    /// | `FORWARD_TIMEOUT_SECS`   | `10`                                          |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `10`                                          |
    /// | `SCAN_BASE_DELAY_MS`     | `500`                                         |
    /// | `SCAN_PER_CHAR_DELAY_MS` | `100`                                         |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = parse_or(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = parse_or(&lookup, "PORT", 8080);

        let analysis_api_url = lookup("PYTHON_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let max_workers = parse_or(&lookup, "MAX_WORKERS", DEFAULT_MAX_WORKERS).max(1);

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://localhost:8080".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port,
            analysis_api_url,
            max_workers,
            cors_origins,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30),
            forward_timeout_secs: parse_or(&lookup, "FORWARD_TIMEOUT_SECS", 10),
            shutdown_timeout_secs: parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 10),
            scan_base_delay_ms: parse_or(
                &lookup,
                "SCAN_BASE_DELAY_MS",
                DEFAULT_BASE_DELAY.as_millis() as u64,
            ),
            scan_per_char_delay_ms: parse_or(
                &lookup,
                "SCAN_PER_CHAR_DELAY_MS",
                DEFAULT_PER_CHAR_DELAY.as_millis() as u64,
            ),
        }
    }

    /// Configuration injected into the forwarding bridge.
    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig::new(self.analysis_api_url.clone())
            .with_timeout(Duration::from_secs(self.forward_timeout_secs))
    }

    /// The scan leaf configured by the simulated latency settings.
    pub fn scanner(&self) -> SimulatedScanner {
        SimulatedScanner::new(
            Duration::from_millis(self.scan_base_delay_ms),
            Duration::from_millis(self.scan_per_char_delay_ms),
        )
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Parse `key` via `lookup`, warning and falling back to `default` on bad input.
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "Invalid configuration value, using default");
            default
        }),
    }
}
