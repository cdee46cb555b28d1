#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Dispatch cancelled before all scans completed")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}
