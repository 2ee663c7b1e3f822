//! # Catalog Actor
//!
//! The catalog service: products, their merchant and their current price. It is the only
//! source of truth for prices; orders copy the price at validation time.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](delivery_actors::ActorEntity) implementation for [`Product`]
//! - [`error`] - [`CatalogError`] type for type-safe error handling
//! - [`actions`] - [`CatalogAction`] for availability changes
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Queries
//!
//! Batched reads go through [`ProductQuery`](crate::model::ProductQuery):
//!
//! ```rust,ignore
//! // Partial results are normal: unknown ids are simply absent.
//! let products = catalog_client.get_products_by_ids(&[ProductId(1), ProductId(9)], deadline).await?;
//!
//! // A merchant's menu, in id order.
//! let menu = catalog_client.products_by_merchant(MerchantId(3), deadline).await?;
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Product;
use delivery_actors::{ResourceActor, ResourceClient};

/// Creates a new Catalog actor and its client.
pub fn new(mailbox_size: usize) -> (ResourceActor<Product>, ResourceClient<Product>) {
    ResourceActor::new(mailbox_size)
}
