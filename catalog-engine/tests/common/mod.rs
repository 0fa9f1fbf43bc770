//! Shared fixtures for the engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use catalog_engine::{CatalogEngine, EngineConfig};
use catalog_store::{
    Document, DocumentStore, Fields, MemoryStore, OrderField, StoreError, StoreQuery,
    StoreResult, WriteMode,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Twenty products, listed in name-ascending order.
///
/// Categories: laptop 5, audio 4, tablet 5, phone 6. Several prices repeat so
/// price ordering depends on the id tie-breaker.
pub const CATALOG: &[(&str, &str, f64, &str)] = &[
    ("p01", "Acer Swift 3", 699.0, "laptop"),
    ("p02", "AirPods Pro", 249.0, "audio"),
    ("p03", "Asus Zenbook", 899.0, "laptop"),
    ("p04", "Bose QuietComfort", 329.0, "audio"),
    ("p05", "Dell XPS 13", 1299.0, "laptop"),
    ("p06", "Fire HD 10", 149.0, "tablet"),
    ("p07", "Galaxy Buds", 149.0, "audio"),
    ("p08", "Galaxy S24", 899.0, "phone"),
    ("p09", "Galaxy Tab S9", 799.0, "tablet"),
    ("p10", "HP Spectre", 1399.0, "laptop"),
    ("p11", "Kindle Paperwhite", 149.0, "tablet"),
    ("p12", "Lenovo ThinkPad", 1199.0, "laptop"),
    ("p13", "Moto G", 199.0, "phone"),
    ("p14", "Nothing Phone", 499.0, "phone"),
    ("p15", "OnePlus 12", 799.0, "phone"),
    ("p16", "Pixel 8", 699.0, "phone"),
    ("p17", "Sony WH-1000XM5", 399.0, "audio"),
    ("p18", "Surface Pro", 999.0, "tablet"),
    ("p19", "iPad Mini", 499.0, "tablet"),
    ("p20", "iPhone 15", 799.0, "phone"),
];

pub fn product_doc(id: &str, name: &str, price: f64, category: &str) -> Document {
    let serde_json::Value::Object(fields) = json!({
        "name": name,
        "price": price,
        "category": category,
        "stock": 3,
        "imageUrl": format!("https://img.example.com/{id}.png"),
    }) else {
        unreachable!()
    };
    Document::new(id, fields)
}

pub fn catalog_store() -> MemoryStore {
    MemoryStore::from_documents(
        "products",
        CATALOG
            .iter()
            .map(|(id, name, price, category)| product_doc(id, name, *price, category)),
    )
}

pub fn ids(products: &[catalog_types::Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

/// Wraps a [`MemoryStore`], counting calls and injecting failures or delays.
#[derive(Default)]
pub struct InstrumentedStore {
    pub inner: MemoryStore,
    executes: AtomicUsize,
    counts: AtomicUsize,
    fail_counts: AtomicBool,
    fail_executes: AtomicBool,
    /// Delay applied to queries whose primary ordering is on this field.
    slow_sort: Mutex<Option<(String, Duration)>>,
}

impl InstrumentedStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn executes(&self) -> usize {
        self.executes.load(Ordering::SeqCst)
    }

    pub fn counts(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
    }

    pub fn fail_counts(&self, fail: bool) {
        self.fail_counts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_executes(&self, fail: bool) {
        self.fail_executes.store(fail, Ordering::SeqCst);
    }

    pub fn slow_when_sorted_by(&self, field: &str, delay: Duration) {
        *self.slow_sort.lock().unwrap() = Some((field.to_string(), delay));
    }

    async fn maybe_delay(&self, query: &StoreQuery) {
        let delay = {
            let slow = self.slow_sort.lock().unwrap();
            slow.as_ref().and_then(|(field, delay)| {
                let primary = query.ordering().first()?;
                matches!(&primary.field, OrderField::Field(path) if path == field)
                    .then_some(*delay)
            })
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl DocumentStore for InstrumentedStore {
    fn backend_name(&self) -> &'static str {
        "instrumented"
    }

    async fn execute(&self, query: &StoreQuery) -> StoreResult<Vec<Document>> {
        self.executes.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay(query).await;
        if self.fail_executes.load(Ordering::SeqCst) {
            return Err(StoreError::Network("connection reset".to_string()));
        }
        self.inner.execute(query).await
    }

    async fn count(&self, query: &StoreQuery) -> StoreResult<u64> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay(query).await;
        if self.fail_counts.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 503,
                message: "backend unavailable".to_string(),
            });
        }
        self.inner.count(query).await
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.inner.get(collection, id).await
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: WriteMode,
    ) -> StoreResult<()> {
        self.inner.set(collection, id, fields, mode).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.inner.delete(collection, id).await
    }
}

/// Engine over the twenty-product catalog, with default configuration.
pub fn instrumented_engine() -> (CatalogEngine, Arc<InstrumentedStore>) {
    let store = Arc::new(InstrumentedStore::new(catalog_store()));
    let engine = CatalogEngine::new(store.clone(), EngineConfig::default()).unwrap();
    (engine, store)
}
