use catalog_store::{
    Direction, Document, DocumentStore, MemoryStore, OrderField, StoreError, StoreQuery,
    WriteMode,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;

fn doc(id: &str, value: serde_json::Value) -> Document {
    let serde_json::Value::Object(fields) = value else {
        panic!("fixture must be an object");
    };
    Document::new(id, fields)
}

fn seeded() -> MemoryStore {
    MemoryStore::from_documents(
        "products",
        vec![
            doc("p1", json!({ "name": "Galaxy S24", "category": "smartphone", "price": 900 })),
            doc("p2", json!({ "name": "Aurora Book", "category": "laptop", "price": 1500.5 })),
            doc("p3", json!({ "name": "Buds", "category": "audio", "price": 120 })),
            doc("p4", json!({ "name": "Galaxy Tab", "category": "tablet", "price": 900 })),
            doc("p5", json!({ "name": "Zen Phone", "category": "smartphone", "price": 450 })),
        ],
    )
}

fn ids(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|d| d.id.as_str()).collect()
}

// ── Querying ─────────────────────────────────────────────────────

#[tokio::test]
async fn unordered_query_returns_id_order() {
    let store = seeded();
    let docs = store.execute(&StoreQuery::collection("products")).await.unwrap();
    assert_eq!(ids(&docs), vec!["p1", "p2", "p3", "p4", "p5"]);
}

#[tokio::test]
async fn missing_collection_is_empty() {
    let store = seeded();
    let docs = store.execute(&StoreQuery::collection("orders")).await.unwrap();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn equality_filter() {
    let store = seeded();
    let query = StoreQuery::collection("products").where_eq("category", "smartphone");
    let docs = store.execute(&query).await.unwrap();
    assert_eq!(ids(&docs), vec!["p1", "p5"]);
}

#[tokio::test]
async fn equality_filter_treats_int_and_float_alike() {
    let store = seeded();
    let query = StoreQuery::collection("products").where_eq("price", 900.0);
    let docs = store.execute(&query).await.unwrap();
    assert_eq!(ids(&docs), vec!["p1", "p4"]);
}

#[tokio::test]
async fn order_by_name_ascending() {
    let store = seeded();
    let query = StoreQuery::collection("products").order_by(OrderField::field("name"), Direction::Asc);
    let docs = store.execute(&query).await.unwrap();
    assert_eq!(ids(&docs), vec!["p2", "p3", "p1", "p4", "p5"]);
}

#[tokio::test]
async fn ties_are_broken_by_id_in_last_direction() {
    let store = seeded();

    let asc = StoreQuery::collection("products").order_by(OrderField::field("price"), Direction::Asc);
    assert_eq!(
        ids(&store.execute(&asc).await.unwrap()),
        vec!["p3", "p5", "p1", "p4", "p2"]
    );

    let desc =
        StoreQuery::collection("products").order_by(OrderField::field("price"), Direction::Desc);
    assert_eq!(
        ids(&store.execute(&desc).await.unwrap()),
        vec!["p2", "p4", "p1", "p5", "p3"]
    );
}

#[tokio::test]
async fn limit_truncates() {
    let store = seeded();
    let query = StoreQuery::collection("products")
        .order_by(OrderField::field("name"), Direction::Asc)
        .limit(2);
    let docs = store.execute(&query).await.unwrap();
    assert_eq!(ids(&docs), vec!["p2", "p3"]);
}

#[tokio::test]
async fn start_after_continues_past_cursor() {
    let store = seeded();
    let base = StoreQuery::collection("products")
        .order_by(OrderField::field("price"), Direction::Asc)
        .order_by(OrderField::DocumentId, Direction::Asc);

    let first = store.execute(&base.clone().limit(3)).await.unwrap();
    assert_eq!(ids(&first), vec!["p3", "p5", "p1"]);

    let cursor = first.last().unwrap().clone();
    let rest = store.execute(&base.start_after(cursor).limit(3)).await.unwrap();
    assert_eq!(ids(&rest), vec!["p4", "p2"]);
}

#[tokio::test]
async fn start_after_deleted_cursor_still_positions_by_key() {
    let store = seeded();
    let query = StoreQuery::collection("products").order_by(OrderField::field("name"), Direction::Asc);
    let all = store.execute(&query).await.unwrap();
    let cursor = all[1].clone(); // Buds

    store.delete("products", &cursor.id).await.unwrap();
    let rest = store.execute(&query.start_after(cursor)).await.unwrap();
    assert_eq!(ids(&rest), vec!["p1", "p4", "p5"]);
}

#[tokio::test]
async fn documents_missing_ordered_field_are_excluded() {
    let store = seeded();
    store.insert("products", doc("p6", json!({ "category": "audio" }))).await;

    let query = StoreQuery::collection("products").order_by(OrderField::field("name"), Direction::Asc);
    let docs = store.execute(&query).await.unwrap();
    assert!(!ids(&docs).contains(&"p6"));
    assert_eq!(store.len("products").await, 6);
}

#[tokio::test]
async fn cursor_lacking_ordered_field_is_rejected() {
    let store = seeded();
    let query = StoreQuery::collection("products")
        .order_by(OrderField::field("name"), Direction::Asc)
        .start_after(doc("x", json!({ "price": 1 })));
    let err = store.execute(&query).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidQuery(_)));
}

#[tokio::test]
async fn count_uses_filters() {
    let store = seeded();
    let query = StoreQuery::collection("products").where_eq("category", "smartphone");
    assert_eq!(store.count(&query).await.unwrap(), 2);
}

// ── Document operations ──────────────────────────────────────────

#[tokio::test]
async fn get_existing_and_missing() {
    let store = seeded();
    let found = store.get("products", "p3").await.unwrap().unwrap();
    assert_eq!(found.field("name"), Some(&json!("Buds")));
    assert!(store.get("products", "nope").await.unwrap().is_none());
}

#[tokio::test]
async fn set_merge_keeps_other_fields() {
    let store = seeded();
    let fields = doc("p3", json!({ "price": 99 })).fields;
    store.set("products", "p3", fields, WriteMode::Merge).await.unwrap();

    let found = store.get("products", "p3").await.unwrap().unwrap();
    assert_eq!(found.field("price"), Some(&json!(99)));
    assert_eq!(found.field("name"), Some(&json!("Buds")));
}

#[tokio::test]
async fn set_overwrite_replaces_document() {
    let store = seeded();
    let fields = doc("p3", json!({ "price": 99 })).fields;
    store.set("products", "p3", fields, WriteMode::Overwrite).await.unwrap();

    let found = store.get("products", "p3").await.unwrap().unwrap();
    assert_eq!(found.field("name"), None);
}

#[tokio::test]
async fn set_creates_nested_collection() {
    let store = MemoryStore::new();
    let fields = doc("p1", json!({ "quantity": 1 })).fields;
    store.set("users/u1/cart", "p1", fields, WriteMode::Merge).await.unwrap();
    assert_eq!(store.len("users/u1/cart").await, 1);
    assert!(store.is_empty("users/u2/cart").await);
}

#[tokio::test]
async fn update_requires_existing_document() {
    let store = seeded();
    let fields = doc("zz", json!({ "price": 1 })).fields;
    let err = store.update("products", "zz", fields).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn delete_missing_is_ok() {
    let store = seeded();
    store.delete("products", "nope").await.unwrap();
    store.delete("ghosts", "nope").await.unwrap();
    assert_eq!(store.len("products").await, 5);
}

#[tokio::test]
async fn retain_drops_documents() {
    let store = seeded();
    store
        .retain("products", |d| d.field("category") != Some(&json!("smartphone")))
        .await;
    assert_eq!(store.len("products").await, 3);
}

#[tokio::test]
async fn nested_field_paths() {
    let store = MemoryStore::from_documents(
        "items",
        vec![
            doc("a", json!({ "meta": { "rank": 2 } })),
            doc("b", json!({ "meta": { "rank": 1 } })),
        ],
    );
    let query = StoreQuery::collection("items").order_by(OrderField::field("meta.rank"), Direction::Asc);
    let docs = store.execute(&query).await.unwrap();
    assert_eq!(ids(&docs), vec!["b", "a"]);
}

// ── Fixtures ─────────────────────────────────────────────────────

#[tokio::test]
async fn from_fixture_reads_json_array() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"id": "p1", "name": "One", "price": 1}}, {{"name": "Anonymous", "price": 2}}]"#
    )
    .unwrap();

    let store = MemoryStore::from_fixture("products", file.path()).unwrap();
    assert_eq!(store.len("products").await, 2);
    let one = store.get("products", "p1").await.unwrap().unwrap();
    assert_eq!(one.field("id"), None);
    assert_eq!(one.field("name"), Some(&json!("One")));
}

#[test]
fn from_fixture_rejects_non_array() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"id": "p1"}}"#).unwrap();
    let err = MemoryStore::from_fixture("products", file.path()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn from_fixture_missing_file() {
    let err = MemoryStore::from_fixture("products", std::path::Path::new("/no/such/file.json"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
}
