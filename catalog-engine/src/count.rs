//! Count estimator.

use crate::error::{EngineError, EngineResult};
use crate::spec::QuerySpec;
use catalog_store::DocumentStore;
use std::num::NonZeroUsize;
use tracing::debug;

/// Counts the products matching a spec's filter. One unbounded read per
/// call; nothing is cached.
pub async fn count_matching(store: &dyn DocumentStore, spec: &QuerySpec) -> EngineResult<u64> {
    let total = store
        .count(&spec.base_query())
        .await
        .map_err(EngineError::Count)?;
    debug!(total, category = ?spec.category_filter(), "counted products");
    Ok(total)
}

/// Pages needed to show `total` products. An empty result is still one page.
pub fn total_pages(total: u64, page_size: NonZeroUsize) -> u32 {
    let pages = total.div_ceil(page_size.get() as u64).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
