//! Error types for store queries.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while querying the metrics store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid store url: {0}")]
    InvalidUrl(String),
}
