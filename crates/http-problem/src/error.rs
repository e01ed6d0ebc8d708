//! Error types for the http-problem crate.

/// Errors that can occur when constructing or serializing an [`HttpError`](crate::HttpError).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Status is not an HTTP error status.
    #[error("invalid HTTP error status {status}: must be within 400..=599")]
    InvalidStatus { status: i64 },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
