//! Query spec builder.
//!
//! A [`QuerySpec`] is the immutable description of filter, sort and page
//! size. It is rebuilt whenever the filter or the sort changes, which is also
//! what invalidates previously resolved cursors.

use crate::config::PRODUCTS_COLLECTION;
use crate::error::EngineError;
use catalog_store::{Direction, OrderField, StoreQuery};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Product field the catalog can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Price,
}

impl SortField {
    /// Document field path for this sort key.
    pub fn field_path(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price",
        }
    }
}

/// Sort field plus direction. Defaults to name ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: Direction,
}

impl Sort {
    pub const fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };
        write!(f, "{}-{}", self.field.field_path(), direction)
    }
}

impl FromStr for Sort {
    type Err = EngineError;

    /// Accepts `name-asc`, `name-desc`, `price-asc`, `price-desc`, the bare
    /// field names (ascending) and the empty string (default).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sort = match s.trim() {
            "" | "name" | "name-asc" => Sort::new(SortField::Name, Direction::Asc),
            "name-desc" => Sort::new(SortField::Name, Direction::Desc),
            "price" | "price-asc" => Sort::new(SortField::Price, Direction::Asc),
            "price-desc" => Sort::new(SortField::Price, Direction::Desc),
            other => return Err(EngineError::UnknownSort(other.to_string())),
        };
        Ok(sort)
    }
}

/// Immutable filter + sort + page size description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySpec {
    collection: String,
    category_filter: Option<String>,
    sort: Sort,
    page_size: NonZeroUsize,
}

impl QuerySpec {
    /// Builds a spec over the products collection. An empty category means
    /// "all products".
    pub fn build(
        category_filter: Option<&str>,
        sort_field: SortField,
        sort_direction: Direction,
        page_size: NonZeroUsize,
    ) -> Self {
        Self {
            collection: PRODUCTS_COLLECTION.to_string(),
            category_filter: category_filter
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            sort: Sort::new(sort_field, sort_direction),
            page_size,
        }
    }

    /// Same spec against another collection path.
    #[must_use]
    pub fn in_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn category_filter(&self) -> Option<&str> {
        self.category_filter.as_deref()
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Filtered and ordered, but unbounded, store query.
    ///
    /// Ordering ends with the document id in the sort direction so that
    /// equal sort keys still have a stable order and page boundaries are
    /// reproducible.
    pub fn base_query(&self) -> StoreQuery {
        let mut query = StoreQuery::collection(self.collection.as_str());
        if let Some(category) = &self.category_filter {
            query = query.where_eq("category", category.as_str());
        }
        query
            .order_by(
                OrderField::field(self.sort.field.field_path()),
                self.sort.direction,
            )
            .order_by(OrderField::DocumentId, self.sort.direction)
    }
}
