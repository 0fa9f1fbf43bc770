//! Pagination state observed by the presentation layer.

use crate::spec::Sort;
use catalog_types::Product;
use serde::{Deserialize, Serialize};

/// Lifecycle of the engine's current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A pipeline is in flight.
    Loading,
    /// Results reflect the latest request.
    Ready,
    /// The latest request failed; see `error_detail`.
    Error,
}

/// Snapshot of the engine's pagination state.
///
/// When `status` is `Ready`: `1 <= current_page <= max(total_pages, 1)` and
/// `results.len() <= page_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
    /// Products matching the filter across all pages.
    pub total_count: u64,
    pub status: Status,
    pub error_detail: Option<String>,
    pub results: Vec<Product>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            total_count: 0,
            status: Status::Idle,
            error_detail: None,
            results: Vec::new(),
        }
    }
}

impl PaginationState {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }
}

/// User-chosen query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub category: Option<String>,
    pub sort: Sort,
    /// The applied (debounced) search term.
    pub search_term: String,
    /// The page most recently requested.
    pub current_page: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            category: None,
            sort: Sort::default(),
            search_term: String::new(),
            current_page: 1,
        }
    }
}
