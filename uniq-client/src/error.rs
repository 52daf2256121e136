//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failed (network unreachable, timeout, bad TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Well-formed response with a non-success status; carries the
    /// server-supplied message verbatim
    #[error("{0}")]
    Rejected(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The operation was superseded and its result must be discarded.
    /// Not a failure: callers drop it without recording an error.
    #[error("request cancelled")]
    Cancelled,

    /// Storage tier I/O failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// True when this outcome came from a cancelled operation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
