//! Conversion between plain JSON and Firestore's typed value encoding.

use crate::document::Fields;
use crate::error::{StoreError, StoreResult};
use serde_json::{Map, Value, json};

/// Encodes a plain JSON value as a Firestore `Value`.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

/// Encodes a field map.
pub fn encode_fields(fields: &Fields) -> Value {
    let encoded: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect();
    Value::Object(encoded)
}

/// Decodes a Firestore `Value` into plain JSON.
///
/// Timestamps, references and bytes become strings; geo points become
/// `{ "latitude", "longitude" }` objects.
pub fn decode_value(value: &Value) -> StoreResult<Value> {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Err(StoreError::InvalidData(format!("not a typed value: {value}")));
    };
    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => Ok(inner.clone()),
        "integerValue" => {
            let raw = inner
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| inner.to_string());
            let parsed: i64 = raw
                .parse()
                .map_err(|_| StoreError::InvalidData(format!("bad integerValue: {raw}")))?;
            Ok(Value::from(parsed))
        }
        "doubleValue" => match inner {
            Value::Number(_) => Ok(inner.clone()),
            // NaN and the infinities arrive as strings
            Value::String(s) => Ok(Value::String(s.clone())),
            other => Err(StoreError::InvalidData(format!("bad doubleValue: {other}"))),
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|vs| vs.iter().map(decode_value).collect::<StoreResult<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Object(fields))
        }
        other => Err(StoreError::InvalidData(format!("unsupported value type: {other}"))),
    }
}

/// Decodes a Firestore field map.
pub fn decode_fields(fields: &Map<String, Value>) -> StoreResult<Fields> {
    fields
        .iter()
        .map(|(k, v)| Ok((k.clone(), decode_value(v)?)))
        .collect()
}
