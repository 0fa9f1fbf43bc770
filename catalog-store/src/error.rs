//! Error types for the store layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur talking to a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connection refused, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The store answered with a non-success status.
    #[error("store returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Document not found where one was required.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The query cannot be executed as written.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A document or value has an unexpected shape.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// IO error (fixture files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
