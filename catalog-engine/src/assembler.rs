//! Result assembler.

use crate::cursor::PageCursor;
use crate::error::{EngineError, EngineResult};
use crate::overlay::search_overlay;
use crate::spec::QuerySpec;
use catalog_store::{Document, DocumentStore};
use catalog_types::Product;
use tracing::debug;

/// Fetches one page (at most `page_size` products after `cursor`) and
/// applies the search overlay to that page only.
///
/// Search never looks beyond the fetched page: a match on a later page stays
/// invisible until the user pages to it.
pub async fn fetch_page(
    store: &dyn DocumentStore,
    spec: &QuerySpec,
    cursor: Option<&PageCursor>,
    search_term: &str,
) -> EngineResult<Vec<Product>> {
    let mut query = spec.base_query().limit(spec.page_size());
    if let Some(cursor) = cursor {
        query = query.start_after(cursor.document().clone());
    }

    let docs = store.execute(&query).await.map_err(EngineError::Fetch)?;
    let fetched = docs.len();
    let products = docs
        .iter()
        .map(decode_product)
        .collect::<EngineResult<Vec<_>>>()?;

    let results = search_overlay(products, search_term);
    debug!(fetched, shown = results.len(), "assembled page");
    Ok(results)
}

/// Decodes and validates a product document.
pub fn decode_product(doc: &Document) -> EngineResult<Product> {
    let product: Product = doc.decode().map_err(EngineError::Fetch)?;
    product.validate()?;
    Ok(product)
}
