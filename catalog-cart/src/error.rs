use catalog_store::StoreError;
use catalog_types::ProductId;
use thiserror::Error;

/// Result type for cart operations.
pub type CartResult<T> = Result<T, CartError>;

/// Errors from cart and profile operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("sign in to use the cart")]
    NotSignedIn,

    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    #[error("product {0} is not in the cart")]
    NotFound(ProductId),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
