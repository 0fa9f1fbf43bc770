use crate::error::{CartError, CartResult};
use catalog_store::{Document, DocumentStore, StoreError, StoreQuery, WriteMode};
use catalog_types::{CartItem, Product, ProductId, UserId};
use serde_json::{Map, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Collection path holding a user's cart.
pub fn cart_collection(user: &UserId) -> String {
    format!("users/{user}/cart")
}

/// Sum of price × quantity over all items.
pub fn subtotal(items: &[CartItem]) -> f64 {
    items.iter().map(CartItem::line_total).sum()
}

fn signed_in(user: Option<&UserId>) -> CartResult<&UserId> {
    user.ok_or(CartError::NotSignedIn)
}

/// Cart operations over a document store.
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn DocumentStore>,
}

impl CartService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All items in the user's cart.
    pub async fn fetch(&self, user: Option<&UserId>) -> CartResult<Vec<CartItem>> {
        let user = signed_in(user)?;
        let docs = self
            .store
            .execute(&StoreQuery::collection(cart_collection(user)))
            .await?;
        let items = docs
            .iter()
            .map(Document::decode::<CartItem>)
            .collect::<Result<Vec<_>, StoreError>>()?;
        debug!(user = %user, items = items.len(), "fetched cart");
        Ok(items)
    }

    /// Adds one unit of `product`.
    ///
    /// Returns `false` if the product was already in the cart, in which case
    /// the existing line is left untouched: its quantity and product snapshot
    /// are kept. This differs from a merge-write of a fresh line, which would
    /// reset the quantity to 1.
    pub async fn add(&self, user: Option<&UserId>, product: &Product) -> CartResult<bool> {
        let user = signed_in(user)?;
        if !product.in_stock() {
            return Err(CartError::OutOfStock(product.id.clone()));
        }

        let collection = cart_collection(user);
        if self
            .store
            .get(&collection, product.id.as_str())
            .await?
            .is_some()
        {
            debug!(user = %user, product = %product.id, "already in cart");
            return Ok(false);
        }

        let fields = Document::encode(&CartItem::from_product(product))?;
        self.store
            .set(&collection, product.id.as_str(), fields, WriteMode::Overwrite)
            .await?;
        info!(user = %user, product = %product.id, "added to cart");
        Ok(true)
    }

    /// Sets the quantity of an item already in the cart.
    pub async fn update_quantity(
        &self,
        user: Option<&UserId>,
        product_id: &ProductId,
        quantity: u32,
    ) -> CartResult<()> {
        let user = signed_in(user)?;
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let mut fields = Map::new();
        fields.insert("quantity".to_string(), json!(quantity));
        match self
            .store
            .update(&cart_collection(user), product_id.as_str(), fields)
            .await
        {
            Ok(()) => {
                debug!(user = %user, product = %product_id, quantity, "cart quantity updated");
                Ok(())
            }
            Err(StoreError::NotFound(_)) => Err(CartError::NotFound(product_id.clone())),
            Err(err) => Err(err.into()),
        }
    }

    /// Removes an item. Removing an item that is not in the cart succeeds.
    pub async fn remove(&self, user: Option<&UserId>, product_id: &ProductId) -> CartResult<()> {
        let user = signed_in(user)?;
        self.store
            .delete(&cart_collection(user), product_id.as_str())
            .await?;
        info!(user = %user, product = %product_id, "removed from cart");
        Ok(())
    }
}
