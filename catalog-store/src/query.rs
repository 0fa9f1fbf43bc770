//! Store query description.
//!
//! A [`StoreQuery`] is the full capability surface the catalog relies on:
//! equality filters, ordering, a result limit and a "start after this
//! document" cursor. Backends translate it into their own wire format.

use crate::document::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort direction of an order clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// What an order clause sorts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderField {
    /// A (possibly dotted) field path.
    Field(String),
    /// The document id, used as a deterministic tie-breaker.
    DocumentId,
}

impl OrderField {
    pub fn field(path: impl Into<String>) -> Self {
        OrderField::Field(path.into())
    }
}

/// One `orderBy` clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: OrderField,
    pub direction: Direction,
}

/// An equality filter: `field == value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

/// A query against one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuery {
    collection: String,
    filters: Vec<FieldFilter>,
    order_by: Vec<OrderBy>,
    limit: Option<usize>,
    start_after: Option<Document>,
}

impl StoreQuery {
    /// Starts a query over the collection at `path` (e.g. `products` or
    /// `users/u1/cart`).
    pub fn collection(path: impl Into<String>) -> Self {
        Self {
            collection: path.into(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            start_after: None,
        }
    }

    /// Adds an equality filter.
    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Appends an order clause.
    #[must_use]
    pub fn order_by(mut self, field: OrderField, direction: Direction) -> Self {
        self.order_by.push(OrderBy { field, direction });
        self
    }

    /// Bounds the number of returned documents. Replaces any earlier limit.
    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Removes the limit.
    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Starts the result set strictly after `cursor` in query order.
    #[must_use]
    pub fn start_after(mut self, cursor: Document) -> Self {
        self.start_after = Some(cursor);
        self
    }

    pub fn collection_path(&self) -> &str {
        &self.collection
    }

    pub fn filters(&self) -> &[FieldFilter] {
        &self.filters
    }

    pub fn ordering(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    pub fn cursor(&self) -> Option<&Document> {
        self.start_after.as_ref()
    }

    /// The ordering the store actually applies: the explicit clauses plus a
    /// trailing document-id clause in the direction of the last one, unless
    /// the id is already ordered on.
    pub fn effective_ordering(&self) -> Vec<OrderBy> {
        let mut ordering = self.order_by.clone();
        if !ordering.iter().any(|o| o.field == OrderField::DocumentId) {
            let direction = ordering.last().map_or(Direction::Asc, |o| o.direction);
            ordering.push(OrderBy {
                field: OrderField::DocumentId,
                direction,
            });
        }
        ordering
    }
}
