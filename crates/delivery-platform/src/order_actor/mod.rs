//! # Order Actor
//!
//! The order store. It persists [`Order`] aggregates that the
//! [`OrderOrchestrator`](crate::ordering::OrderOrchestrator) has already validated against the
//! catalog, re-checks their structural invariants and drives the status state machine:
//!
//! ```text
//! CREATED ──Confirm──▶ CONFIRMED
//!    │
//!    └────Cancel────▶ CANCELLED
//! ```
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](delivery_actors::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderStoreError`]
//! - [`actions`] - [`OrderAction`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! The only dependency is the [`Clock`] that stamps `created_at` ([`OrderContext`]). Catalog
//! lookups happen before the order reaches the store, so the store never calls another
//! service while holding its mailbox.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::auth::Clock;
use crate::model::Order;
use delivery_actors::{ResourceActor, ResourceClient};
use std::sync::Arc;

/// Context handed to the order actor's `run()`.
#[derive(Clone)]
pub struct OrderContext {
    pub clock: Arc<dyn Clock>,
}

/// Creates a new Order actor and its client.
pub fn new(mailbox_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(mailbox_size)
}
