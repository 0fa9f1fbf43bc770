//! Client-side search overlay.

use catalog_types::Product;

/// Narrows an already-fetched page to products whose name or description
/// contains `term`, case-insensitively. A blank term keeps everything.
///
/// The result is a subsequence of the input in the same order.
pub fn search_overlay(mut products: Vec<Product>, term: &str) -> Vec<Product> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return products;
    }
    products.retain(|p| p.matches_lowercase(&needle));
    products
}
