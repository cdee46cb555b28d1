//! HTTP client for the downstream analysis API.

use chrono::Utc;

use discovery_core::types::ScanResult;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::payload::AnalyzePayload;

/// Forwards scan results to `POST {base_url}/discovery/analyze`.
///
/// Holds a pooled [`reqwest::Client`]; share one instance behind an `Arc`.
#[derive(Debug)]
pub struct AnalysisBridge {
    client: reqwest::Client,
    config: BridgeConfig,
}

impl AnalysisBridge {
    /// Build a bridge with its own HTTP client using `config.timeout`.
    pub fn new(config: BridgeConfig) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Build a bridge around an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: BridgeConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Send one scan result to the analysis API.
    ///
    /// Any 2xx status counts as success; the response body is ignored.
    pub async fn forward(&self, result: &ScanResult) -> Result<(), BridgeError> {
        let payload = AnalyzePayload::new(result, Utc::now());

        let response = self
            .client
            .post(self.config.analyze_url())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
            return Err(BridgeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
