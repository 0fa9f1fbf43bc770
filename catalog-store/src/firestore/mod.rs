//! Cloud Firestore storage implementation.
//!
//! Uses the Firestore REST API v1: `:runQuery` for structured queries and the
//! document endpoints for single-document reads and writes.

mod value;

pub use value::{decode_fields, decode_value, encode_fields, encode_value};

use crate::document::{Document, Fields};
use crate::error::{StoreError, StoreResult};
use crate::query::{Direction, OrderField, StoreQuery};
use crate::store::{DocumentStore, WriteMode};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::debug;

/// Firestore specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirestoreConfig {
    /// Google Cloud project id.
    pub project_id: String,
    /// Database id within the project.
    pub database: String,
    /// Base URL for the Firestore API (e.g. `https://firestore.googleapis.com`).
    pub api_base_url: String,
    /// OAuth2 bearer token; requests are unauthenticated without one.
    pub access_token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database: "(default)".to_string(),
            api_base_url: "https://firestore.googleapis.com".to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

/// `:runQuery` streams one of these per result (plus progress entries
/// without a document).
#[derive(Debug, Deserialize)]
struct RunQueryResponse {
    document: Option<FsDocument>,
}

#[derive(Debug, Deserialize)]
struct FsDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Firestore-backed document store.
pub struct FirestoreStore {
    config: FirestoreConfig,
    client: Client,
}

impl FirestoreStore {
    /// Creates a new Firestore store instance.
    pub fn new(config: FirestoreConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self { config, client }
    }

    /// Replaces the bearer token (e.g. after the identity provider refreshed it).
    pub fn set_access_token(&mut self, token: Option<String>) {
        self.config.access_token = token;
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    /// `projects/{p}/databases/{d}/documents`
    fn documents_resource(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.config.project_id, self.config.database
        )
    }

    fn documents_url(&self) -> String {
        format!("{}/v1/{}", self.config.api_base_url, self.documents_resource())
    }

    /// Full resource name of a document, as used by `referenceValue`.
    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_resource(), collection, id)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_url(), collection, id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Splits `users/u1/cart` into the `:runQuery` URL of its parent and the
    /// collection id `cart`.
    fn run_query_target(&self, collection: &str) -> StoreResult<(String, String)> {
        let segments: Vec<&str> = collection.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) || segments.len() % 2 == 0 {
            return Err(StoreError::InvalidQuery(format!(
                "not a collection path: {collection:?}"
            )));
        }
        let (parent, collection_id) = segments.split_at(segments.len() - 1);
        let url = if parent.is_empty() {
            format!("{}:runQuery", self.documents_url())
        } else {
            format!("{}/{}:runQuery", self.documents_url(), parent.join("/"))
        };
        Ok((url, collection_id[0].to_string()))
    }

    fn field_path(&self, field: &OrderField) -> String {
        match field {
            OrderField::Field(path) => path.clone(),
            OrderField::DocumentId => "__name__".to_string(),
        }
    }

    /// Builds the `structuredQuery` body for a query.
    fn structured_query(&self, query: &StoreQuery, collection_id: &str) -> StoreResult<Value> {
        let mut structured = Map::new();
        structured.insert("from".into(), json!([{ "collectionId": collection_id }]));

        let filters: Vec<Value> = query
            .filters()
            .iter()
            .map(|f| {
                json!({
                    "fieldFilter": {
                        "field": { "fieldPath": f.field },
                        "op": "EQUAL",
                        "value": encode_value(&f.value),
                    }
                })
            })
            .collect();
        match filters.len() {
            0 => {}
            1 => {
                structured.insert("where".into(), filters[0].clone());
            }
            _ => {
                structured.insert(
                    "where".into(),
                    json!({ "compositeFilter": { "op": "AND", "filters": filters } }),
                );
            }
        }

        // With a cursor the id tie-breaker must be explicit so the cursor
        // carries one value per clause.
        let ordering = if query.cursor().is_some() {
            query.effective_ordering()
        } else {
            query.ordering().to_vec()
        };
        if !ordering.is_empty() {
            let order_by: Vec<Value> = ordering
                .iter()
                .map(|o| {
                    json!({
                        "field": { "fieldPath": self.field_path(&o.field) },
                        "direction": match o.direction {
                            Direction::Asc => "ASCENDING",
                            Direction::Desc => "DESCENDING",
                        },
                    })
                })
                .collect();
            structured.insert("orderBy".into(), Value::Array(order_by));
        }

        if let Some(cursor) = query.cursor() {
            let values = ordering
                .iter()
                .map(|o| match &o.field {
                    OrderField::Field(path) => cursor.field(path).map(encode_value).ok_or_else(|| {
                        StoreError::InvalidQuery(format!(
                            "cursor document {} lacks ordered field {path}",
                            cursor.id
                        ))
                    }),
                    OrderField::DocumentId => Ok(json!({
                        "referenceValue": self.document_name(query.collection_path(), &cursor.id)
                    })),
                })
                .collect::<StoreResult<Vec<_>>>()?;
            structured.insert("startAt".into(), json!({ "values": values, "before": false }));
        }

        if let Some(limit) = query.limit_value() {
            structured.insert("limit".into(), json!(limit));
        }

        Ok(json!({ "structuredQuery": structured }))
    }

    fn parse_document(&self, doc: FsDocument) -> StoreResult<Document> {
        let id = doc
            .name
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| StoreError::InvalidData(format!("bad document name: {}", doc.name)))?
            .to_string();
        Ok(Document::new(id, decode_fields(&doc.fields)?))
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> StoreResult<Response> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("{what} failed: {e}")))
    }

    async fn api_error(response: Response) -> StoreError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        StoreError::Api { status, message }
    }

    async fn patch(
        &self,
        collection: &str,
        id: &str,
        fields: &Fields,
        params: Vec<(&str, String)>,
    ) -> StoreResult<Response> {
        let request = self
            .client
            .patch(self.document_url(collection, id))
            .query(&params)
            .json(&json!({ "fields": encode_fields(fields) }));
        self.send(request, "document write").await
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn backend_name(&self) -> &'static str {
        "firestore"
    }

    async fn execute(&self, query: &StoreQuery) -> StoreResult<Vec<Document>> {
        let (url, collection_id) = self.run_query_target(query.collection_path())?;
        let body = self.structured_query(query, &collection_id)?;

        debug!(
            collection = query.collection_path(),
            limit = ?query.limit_value(),
            "running Firestore query"
        );

        let response = self.send(self.client.post(url).json(&body), "query").await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let entries: Vec<RunQueryResponse> = response
            .json()
            .await
            .map_err(|e| StoreError::Network(format!("failed to parse query response: {e}")))?;

        entries
            .into_iter()
            .filter_map(|entry| entry.document)
            .map(|doc| self.parse_document(doc))
            .collect()
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        debug!("Fetching document {}/{}", collection, id);

        let request = self.client.get(self.document_url(collection, id));
        let response = self.send(request, "document read").await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let doc: FsDocument = response
            .json()
            .await
            .map_err(|e| StoreError::Network(format!("failed to parse document: {e}")))?;
        self.parse_document(doc).map(Some)
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: WriteMode,
    ) -> StoreResult<()> {
        let params: Vec<(&str, String)> = match mode {
            WriteMode::Overwrite => Vec::new(),
            WriteMode::Merge => fields
                .keys()
                .map(|k| ("updateMask.fieldPaths", k.clone()))
                .collect(),
        };
        let response = self.patch(collection, id, &fields, params).await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        debug!("Wrote document {}/{}", collection, id);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        let mut params: Vec<(&str, String)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", k.clone()))
            .collect();
        params.push(("currentDocument.exists", "true".to_string()));

        let response = self.patch(collection, id, &fields, params).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("{collection}/{id}")));
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        debug!("Updated document {}/{}", collection, id);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let request = self.client.delete(self.document_url(collection, id));
        let response = self.send(request, "document delete").await?;

        if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
            return Err(Self::api_error(response).await);
        }
        debug!("Deleted document {}/{}", collection, id);
        Ok(())
    }
}
