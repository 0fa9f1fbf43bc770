//! Documents as returned by a store.

use crate::error::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field map of a document.
pub type Fields = Map<String, Value>;

/// A single document: its store-assigned id and its fields.
///
/// The id is not part of `fields`; [`Document::decode`] injects it under the
/// `id` key so typed projections can carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: Fields,
}

impl Document {
    /// Creates a document.
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Builds a document from a JSON object, taking the id from its `id` key.
    pub fn from_value(value: Value) -> StoreResult<Self> {
        let Value::Object(mut fields) = value else {
            return Err(StoreError::InvalidData("document must be a JSON object".into()));
        };
        let id = match fields.remove("id") {
            Some(Value::String(id)) if !id.is_empty() => id,
            Some(other) => {
                return Err(StoreError::InvalidData(format!(
                    "document id must be a non-empty string, got {other}"
                )));
            }
            None => uuid::Uuid::now_v7().to_string(),
        };
        Ok(Self { id, fields })
    }

    /// Looks up a field by dotted path (`a.b.c`).
    pub fn field(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Decodes the document into a typed projection, with `id` injected.
    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        let mut fields = self.fields.clone();
        fields.insert("id".into(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Encodes a typed value as a field map, dropping its `id` key.
    pub fn encode<T: Serialize>(value: &T) -> StoreResult<Fields> {
        match serde_json::to_value(value)? {
            Value::Object(mut fields) => {
                fields.remove("id");
                Ok(fields)
            }
            other => Err(StoreError::InvalidData(format!(
                "expected an object to encode as document fields, got {other}"
            ))),
        }
    }
}
