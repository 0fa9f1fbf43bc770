//! In-process document store.
//!
//! Implements the same query semantics as the remote store: documents that
//! lack an ordered field are excluded, ordering always ends with an implicit
//! document-id clause, and `start_after` compares by order key rather than by
//! position.

use crate::document::{Document, Fields};
use crate::error::{StoreError, StoreResult};
use crate::ordering::{compare_documents, values_equal};
use crate::query::{OrderBy, OrderField, StoreQuery};
use crate::store::{DocumentStore, WriteMode};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

type Collection = BTreeMap<String, Fields>;

/// Document store backed by in-memory maps, keyed by collection path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding one seeded collection.
    pub fn from_documents(
        collection: &str,
        documents: impl IntoIterator<Item = Document>,
    ) -> Self {
        let docs: Collection = documents.into_iter().map(|d| (d.id, d.fields)).collect();
        let mut collections = HashMap::new();
        collections.insert(collection.to_string(), docs);
        Self {
            collections: Arc::new(RwLock::new(collections)),
        }
    }

    /// Seeds a collection from a JSON file holding an array of objects.
    ///
    /// Each object's `id` key becomes the document id; objects without one
    /// get a generated id.
    pub fn from_fixture(collection: &str, path: &Path) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let Value::Array(items) = serde_json::from_str(&raw)? else {
            return Err(StoreError::InvalidData(format!(
                "fixture {} must contain a JSON array",
                path.display()
            )));
        };
        let documents = items
            .into_iter()
            .map(Document::from_value)
            .collect::<StoreResult<Vec<_>>>()?;
        debug!("Loaded {} fixture documents into {}", documents.len(), collection);
        Ok(Self::from_documents(collection, documents))
    }

    /// Inserts or replaces a document.
    pub async fn insert(&self, collection: &str, document: Document) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(document.id, document.fields);
    }

    /// Number of documents in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Whether a collection is empty or missing.
    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }

    /// Keeps only the documents for which `keep` returns true.
    pub async fn retain(&self, collection: &str, mut keep: impl FnMut(&Document) -> bool) {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.retain(|id, fields| keep(&Document::new(id.clone(), fields.clone())));
        }
    }
}

fn has_ordered_fields(doc: &Document, ordering: &[OrderBy]) -> bool {
    ordering.iter().all(|o| match &o.field {
        OrderField::Field(path) => doc.field(path).is_some(),
        OrderField::DocumentId => true,
    })
}

fn matches_filters(doc: &Document, query: &StoreQuery) -> bool {
    query.filters().iter().all(|f| {
        doc.field(&f.field)
            .is_some_and(|value| values_equal(value, &f.value))
    })
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn execute(&self, query: &StoreQuery) -> StoreResult<Vec<Document>> {
        let ordering = query.effective_ordering();

        if let Some(cursor) = query.cursor() {
            if !has_ordered_fields(cursor, &ordering) {
                return Err(StoreError::InvalidQuery(format!(
                    "cursor document {} lacks an ordered field",
                    cursor.id
                )));
            }
        }

        let collections = self.collections.read().await;
        let Some(docs) = collections.get(query.collection_path()) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Document> = docs
            .iter()
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .filter(|doc| matches_filters(doc, query) && has_ordered_fields(doc, &ordering))
            .collect();
        drop(collections);

        matched.sort_by(|a, b| compare_documents(a, b, &ordering));

        if let Some(cursor) = query.cursor() {
            matched.retain(|doc| compare_documents(doc, cursor, &ordering) == Ordering::Greater);
        }
        if let Some(limit) = query.limit_value() {
            matched.truncate(limit);
        }

        debug!(
            collection = query.collection_path(),
            returned = matched.len(),
            "memory query executed"
        );
        Ok(matched)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: WriteMode,
    ) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if mode == WriteMode::Merge {
            if let Some(existing) = docs.get_mut(id) {
                existing.extend(fields);
                return Ok(());
            }
        }
        docs.insert(id.to_string(), fields);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
        existing.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}
