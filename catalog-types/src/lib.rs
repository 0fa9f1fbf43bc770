//! Core type definitions for the catalog browser.
//!
//! This crate defines the fundamental types shared by the store, the query
//! engine and the cart:
//! - Product and user identifiers (store-assigned strings)
//! - The read-only `Product` projection
//! - Cart line items and user profiles
//!
//! Nothing in here talks to a store; decoding from store documents lives in
//! `catalog-store`.

mod cart;
mod ids;
mod product;
mod profile;

pub use cart::CartItem;
pub use ids::{ProductId, UserId};
pub use product::Product;
pub use profile::{Role, UserProfile};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("identifier must not be empty")]
    EmptyId,

    #[error("invalid product {id}: {reason}")]
    InvalidProduct { id: String, reason: String },

    #[error("unknown role: {0}")]
    UnknownRole(String),
}
