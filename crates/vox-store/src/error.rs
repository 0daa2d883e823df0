use thiserror::Error;

/// Errors from object storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested object does not exist.
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Network-level or service-level failure.
    #[error("store transport error: {0}")]
    Transport(String),

    /// The adapter is misconfigured (bad endpoint, missing secret).
    #[error("store configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Transport(e.to_string())
    }
}
