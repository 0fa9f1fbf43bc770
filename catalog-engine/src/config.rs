use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;

/// Products shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Quiescence interval before a search term is applied.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Collection holding the catalog.
pub const PRODUCTS_COLLECTION: &str = "products";

/// Configuration for the catalog engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Products per page. Fixed for the engine's lifetime.
    pub page_size: usize,
    /// Search debounce interval (ms).
    pub debounce_ms: u64,
    /// Catalog collection path.
    pub collection: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            collection: PRODUCTS_COLLECTION.to_string(),
        }
    }
}

impl EngineConfig {
    /// Search debounce interval.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validates the configuration and returns the page size.
    pub fn validate(&self) -> EngineResult<NonZeroUsize> {
        if self.collection.is_empty() {
            return Err(EngineError::InvalidConfig(
                "collection must not be empty".to_string(),
            ));
        }
        NonZeroUsize::new(self.page_size).ok_or_else(|| {
            EngineError::InvalidConfig("page_size must be a positive integer".to_string())
        })
    }
}
