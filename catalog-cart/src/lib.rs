//! Shopping cart and user profile access.
//!
//! Carts live in the per-user sub-collection `users/{uid}/cart`, one document
//! per product keyed by the product id. Every cart operation needs a signed-in
//! user; the identity itself is supplied by the caller.

mod cart;
mod error;
mod profile;

pub use cart::{CartService, cart_collection, subtotal};
pub use error::{CartError, CartResult};
pub use profile::{load_profile, profile_path};
