//! Document store layer for the catalog browser.
//!
//! The catalog lives in a remote document store that offers equality
//! filters, ordering, a limit and a "start after document" cursor, but no
//! numeric offsets and no full-text search. This crate models exactly that
//! surface.
//!
//! # Backends
//!
//! - [`MemoryStore`]: in-process collections, used by tests and the CLI's
//!   fixture mode
//! - [`firestore::FirestoreStore`]: Cloud Firestore over its REST API
//!
//! # Example
//!
//! ```
//! use catalog_store::{Direction, OrderField, StoreQuery};
//!
//! let query = StoreQuery::collection("products")
//!     .where_eq("category", "laptop")
//!     .order_by(OrderField::field("price"), Direction::Desc)
//!     .order_by(OrderField::DocumentId, Direction::Desc)
//!     .limit(8);
//!
//! assert_eq!(query.limit_value(), Some(8));
//! ```

mod document;
mod error;
pub mod firestore;
mod memory;
pub mod ordering;
mod query;
mod store;

pub use document::{Document, Fields};
pub use error::{StoreError, StoreResult};
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use memory::MemoryStore;
pub use query::{Direction, FieldFilter, OrderBy, OrderField, StoreQuery};
pub use store::{DocumentStore, WriteMode};
