//! Catalog query engine.
//!
//! Turns user-chosen query parameters (category filter, sort order, search
//! term, page number) into a stable page of products, against a store that
//! only supports cursor pagination.
//!
//! # Components
//!
//! - **Spec**: builds the immutable filter + sort + page size description
//! - **Count**: counts matching products to derive the page count
//! - **Cursor**: emulates offsets by locating the last document of the
//!   previous page
//! - **Assembler**: fetches a page after the cursor and applies the search
//!   overlay to it
//! - **Engine**: the pagination state machine tying the above together
//!
//! # Example
//!
//! ```no_run
//! use catalog_engine::{CatalogEngine, EngineConfig};
//! use catalog_store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn demo() -> catalog_engine::EngineResult<()> {
//! let engine = CatalogEngine::new(Arc::new(MemoryStore::new()), EngineConfig::default())?;
//! engine.refresh().await;
//! engine.set_filter(Some("laptop".to_string())).await;
//! let state = engine.snapshot();
//! println!("page {} of {}", state.current_page, state.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
mod config;
pub mod count;
pub mod cursor;
mod engine;
mod error;
pub mod overlay;
pub mod spec;
mod state;

pub use config::{DEFAULT_DEBOUNCE_MS, DEFAULT_PAGE_SIZE, EngineConfig, PRODUCTS_COLLECTION};
pub use cursor::PageCursor;
pub use engine::CatalogEngine;
pub use error::{EngineError, EngineResult};
pub use overlay::search_overlay;
pub use spec::{QuerySpec, Sort, SortField};
pub use state::{PaginationState, QueryParams, Status};
