//! # ActorEntity Trait
//!
//! The contract every stored resource (users, catalog products, orders) implements to be
//! managed by the generic [`ResourceActor`](crate::ResourceActor). Associated types pin down
//! the id, the create/update payloads, custom actions, queries, the injected context and the
//! per-actor error, so a `ProductCreate` can never reach the user store.
//!
//! Lifecycle hooks with default implementations:
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//! - [`ActorEntity::conflicts_with`]

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// Hooks are async so they can call other actors through clients carried in `Context`.
/// The context is handed to `run()` rather than `new()`, which lets actors be created first
/// and wired afterwards.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier. Built from the actor's `u32` counter; ordered so the store
    /// iterates and answers queries in id order.
    type Id: Eq + Ord + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations beyond CRUD (e.g. `Confirm` on an order).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Read-only filter evaluated against every stored entity.
    type Query: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// One error enum for the whole actor rather than one per message.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full entity from the id and payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Whether this entity belongs in the answer to `query`.
    fn matches(&self, query: &Self::Query) -> bool;

    /// Checked against every other stored entity before a create or update is committed.
    /// Returning an error rejects the write and leaves the store untouched.
    fn conflicts_with(&self, _other: &Self) -> Option<Self::Error> {
        None
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction and before the entity is inserted.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update. Runs on a copy, so a failed update never leaves partial changes.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
