//! Error types for the query engine.

use catalog_store::StoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised inside the query pipeline.
///
/// None of these cross the engine/presentation boundary: the state machine
/// turns them into `Status::Error` with [`EngineError::user_message`] as the
/// detail.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected engine configuration.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Unrecognised sort key.
    #[error("unknown sort: {0}")]
    UnknownSort(String),

    /// The count query failed.
    #[error("count query failed: {0}")]
    Count(#[source] StoreError),

    /// The requested page has no boundary document: the result set shrank
    /// since it was last counted.
    #[error("page {page} is out of range")]
    PageOutOfRange { page: u32 },

    /// The boundary or page query failed.
    #[error("page fetch failed: {0}")]
    Fetch(#[source] StoreError),

    /// A fetched document is not a valid product.
    #[error("malformed product: {0}")]
    Product(#[from] catalog_types::Error),
}

impl EngineError {
    /// Human-readable description for the presentation layer, free of store
    /// error codes.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::InvalidConfig(_) | EngineError::UnknownSort(_) => self.to_string(),
            EngineError::Count(_) => "Failed to count products".to_string(),
            EngineError::PageOutOfRange { page } => {
                format!("Page {page} is no longer available")
            }
            EngineError::Fetch(_) => "Failed to fetch products".to_string(),
            EngineError::Product(_) => "The catalog returned a malformed product".to_string(),
        }
    }
}
