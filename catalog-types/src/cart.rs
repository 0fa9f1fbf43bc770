use crate::ids::ProductId;
use crate::product::Product;
use serde::{Deserialize, Serialize};

/// A line in a user's cart: a snapshot of the product taken when it was
/// added, plus the chosen quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    pub quantity: u32,
}

impl CartItem {
    /// Snapshots a product into a new cart line with quantity 1.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            category: product.category.clone(),
            image_url: product.image_url.clone(),
            quantity: 1,
        }
    }

    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}
