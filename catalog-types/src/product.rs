use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Read-only projection of a catalog product.
///
/// Products are created and edited by an external catalog-management
/// process; the browser only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub image_url: String,
}

impl Product {
    /// Checks the invariants the type system cannot express.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(crate::Error::InvalidProduct {
                id: self.id.to_string(),
                reason: format!("price must be a non-negative number, got {}", self.price),
            });
        }
        Ok(())
    }

    /// Whether at least one unit is available.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Case-insensitive substring match on name and description.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}
