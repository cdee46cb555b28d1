/// Errors from a single forward attempt.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The analysis API returned a non-2xx status code.
    #[error("Analysis API returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}
