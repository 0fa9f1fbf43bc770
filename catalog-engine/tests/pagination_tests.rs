mod common;

use catalog_engine::assembler::fetch_page;
use catalog_engine::count::{count_matching, total_pages};
use catalog_engine::cursor::resolve_cursor;
use catalog_engine::{EngineError, QuerySpec, SortField, search_overlay};
use catalog_store::{Direction, MemoryStore};
use catalog_types::{Product, ProductId};
use common::{catalog_store, ids, product_doc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::num::NonZeroUsize;

fn spec(category: Option<&str>, field: SortField, direction: Direction, size: usize) -> QuerySpec {
    QuerySpec::build(category, field, direction, NonZeroUsize::new(size).unwrap())
}

fn product(id: &str, name: &str, description: Option<&str>) -> Product {
    Product {
        id: ProductId::new(id).unwrap(),
        name: name.to_string(),
        description: description.map(str::to_string),
        price: 10.0,
        category: "misc".to_string(),
        stock: 1,
        image_url: String::new(),
    }
}

// ── Count ────────────────────────────────────────────────────────

#[test]
fn total_pages_edges() {
    let eight = NonZeroUsize::new(8).unwrap();
    assert_eq!(total_pages(0, eight), 1);
    assert_eq!(total_pages(1, eight), 1);
    assert_eq!(total_pages(8, eight), 1);
    assert_eq!(total_pages(9, eight), 2);
    assert_eq!(total_pages(20, eight), 3);
}

#[tokio::test]
async fn counts_respect_the_filter() {
    let store = catalog_store();
    let all = spec(None, SortField::Name, Direction::Asc, 8);
    let phones = spec(Some("phone"), SortField::Name, Direction::Asc, 8);
    assert_eq!(count_matching(&store, &all).await.unwrap(), 20);
    assert_eq!(count_matching(&store, &phones).await.unwrap(), 6);
}

// ── Cursor walker ────────────────────────────────────────────────

#[tokio::test]
async fn first_page_needs_no_cursor() {
    let store = catalog_store();
    let spec = spec(None, SortField::Name, Direction::Asc, 8);
    assert!(resolve_cursor(&store, &spec, 1).await.unwrap().is_none());
    assert!(resolve_cursor(&store, &spec, 0).await.unwrap().is_none());
}

#[tokio::test]
async fn cursor_is_last_document_of_previous_page() {
    let store = catalog_store();
    let spec = spec(None, SortField::Name, Direction::Asc, 8);
    let cursor = resolve_cursor(&store, &spec, 3).await.unwrap().unwrap();
    assert_eq!(cursor.document().id, "p16");
}

#[tokio::test]
async fn missing_boundary_is_out_of_range() {
    let store = catalog_store();
    let spec = spec(None, SortField::Name, Direction::Asc, 8);
    let err = resolve_cursor(&store, &spec, 4).await.unwrap_err();
    assert!(matches!(err, EngineError::PageOutOfRange { page: 4 }));
}

#[tokio::test]
async fn pages_of_twenty() {
    let store = catalog_store();
    let spec = spec(None, SortField::Name, Direction::Asc, 8);

    let mut sizes = Vec::new();
    for page in 1..=3 {
        let cursor = resolve_cursor(&store, &spec, page).await.unwrap();
        let results = fetch_page(&store, &spec, cursor.as_ref(), "").await.unwrap();
        sizes.push(results.len());
    }
    assert_eq!(sizes, vec![8, 8, 4]);
}

#[tokio::test]
async fn search_overlay_on_fetched_page() {
    let store = catalog_store();
    let spec = spec(None, SortField::Name, Direction::Asc, 8);
    let results = fetch_page(&store, &spec, None, "galaxy").await.unwrap();
    assert_eq!(ids(&results), vec!["p07", "p08"]);
}

// ── Search overlay ───────────────────────────────────────────────

#[test]
fn overlay_matches_name_or_description_case_insensitively() {
    let products = vec![
        product("a", "Galaxy S24", None),
        product("b", "Pixel 8", Some("Compares well with the GALAXY line")),
        product("c", "Moto G", Some("Budget")),
    ];
    assert_eq!(ids(&search_overlay(products.clone(), "  Galaxy ")), vec!["a", "b"]);
    assert_eq!(search_overlay(products.clone(), "").len(), 3);
    assert_eq!(search_overlay(products.clone(), "   ").len(), 3);
    assert!(search_overlay(products, "tablet").is_empty());
}

fn arb_products() -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec(("[a-c]{1,4}", prop::option::of("[a-c ]{0,6}")), 0..12).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (name, description))| {
                    product(&format!("p{i}"), &name, description.as_deref())
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn overlay_is_an_ordered_subsequence(products in arb_products(), term in "[a-c]{0,2}") {
        let filtered = search_overlay(products.clone(), &term);
        let mut rest = products.iter();
        for kept in &filtered {
            prop_assert!(rest.any(|p| p == kept));
        }
        prop_assert!(filtered.len() <= products.len());
    }

    #[test]
    fn overlay_is_idempotent(products in arb_products(), term in "[a-c]{0,2}") {
        let once = search_overlay(products, &term);
        let twice = search_overlay(once.clone(), &term);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn total_pages_covers_every_product(total in 0u64..10_000, size in 1usize..64) {
        let pages = total_pages(total, NonZeroUsize::new(size).unwrap());
        prop_assert!(pages >= 1);
        prop_assert!(u64::from(pages) * size as u64 >= total);
        if total > 0 {
            prop_assert!(u64::from(pages - 1) * (size as u64) < total);
        }
    }

    /// Walking every page yields each matching product exactly once, in
    /// sort order, even when many products share a price.
    #[test]
    fn walking_all_pages_has_no_gaps_or_duplicates(
        prices in prop::collection::vec(0u8..4, 0..30),
        size in 1usize..7,
        descending in any::<bool>(),
    ) {
        let store = MemoryStore::from_documents(
            "products",
            prices.iter().enumerate().map(|(i, price)| {
                product_doc(&format!("p{i:02}"), &format!("item {i}"), f64::from(*price), "misc")
            }),
        );
        let direction = if descending { Direction::Desc } else { Direction::Asc };
        let spec = spec(None, SortField::Price, direction, size);

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let walked: Vec<String> = runtime.block_on(async {
            let total = count_matching(&store, &spec).await.unwrap();
            let pages = total_pages(total, NonZeroUsize::new(size).unwrap());
            let mut walked = Vec::new();
            for page in 1..=pages {
                let cursor = resolve_cursor(&store, &spec, page).await.unwrap();
                let results = fetch_page(&store, &spec, cursor.as_ref(), "").await.unwrap();
                prop_assert!(results.len() <= size);
                walked.extend(results.into_iter().map(|p| p.id.to_string()));
            }
            Ok(walked)
        })?;

        let mut expected: Vec<(u8, String)> = prices
            .iter()
            .enumerate()
            .map(|(i, price)| (*price, format!("p{i:02}")))
            .collect();
        expected.sort();
        if descending {
            expected.reverse();
        }
        let expected: Vec<String> = expected.into_iter().map(|(_, id)| id).collect();
        prop_assert_eq!(walked, expected);
    }
}
