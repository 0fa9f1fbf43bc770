//! Cursor walker.
//!
//! The store can only answer "N documents after document D". To show page
//! `p` the walker reads the first `(p - 1) * page_size` documents and keeps
//! the last one as the boundary the page fetch starts after.

use crate::error::{EngineError, EngineResult};
use crate::spec::QuerySpec;
use catalog_store::{Document, DocumentStore};
use tracing::debug;

/// The last document of the previous page. Only valid for the query spec it was
/// resolved against.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor(Document);

impl PageCursor {
    pub fn document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }
}

/// Resolves the cursor for `page`. Page 1 needs none.
pub async fn resolve_cursor(
    store: &dyn DocumentStore,
    spec: &QuerySpec,
    page: u32,
) -> EngineResult<Option<PageCursor>> {
    if page <= 1 {
        return Ok(None);
    }

    let skipped = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(spec.page_size()))
        .ok_or(EngineError::PageOutOfRange { page })?;

    let boundary_query = spec.base_query().limit(skipped);
    let mut docs = store
        .execute(&boundary_query)
        .await
        .map_err(EngineError::Fetch)?;

    if docs.len() < skipped {
        debug!(page, skipped, available = docs.len(), "no boundary document");
        return Err(EngineError::PageOutOfRange { page });
    }

    Ok(docs.pop().map(PageCursor))
}
