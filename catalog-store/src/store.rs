//! Document store abstraction trait.
//!
//! Defines the common interface for document store backends. The catalog
//! engine depends only on this capability surface, never on a concrete store.

use crate::document::{Document, Fields};
use crate::error::StoreResult;
use crate::query::StoreQuery;
use async_trait::async_trait;

/// How `set` treats an existing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Replace the whole document.
    #[default]
    Overwrite,
    /// Only write the given fields, keep the others.
    Merge,
}

/// Abstract document store interface.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the name of the backend, for logging.
    fn backend_name(&self) -> &'static str;

    /// Runs a query and returns matching documents in query order.
    async fn execute(&self, query: &StoreQuery) -> StoreResult<Vec<Document>>;

    /// Counts the documents a query matches.
    ///
    /// Stores without an aggregate primitive fall back to executing the
    /// query and counting the results.
    async fn count(&self, query: &StoreQuery) -> StoreResult<u64> {
        Ok(self.execute(query).await?.len() as u64)
    }

    /// Fetches a single document by id.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Creates or writes a document.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: WriteMode,
    ) -> StoreResult<()>;

    /// Updates fields of an existing document; fails with `NotFound` if it
    /// does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()>;

    /// Deletes a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;
}
