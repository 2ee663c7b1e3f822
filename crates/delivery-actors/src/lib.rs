//! # Delivery Actors
//!
//! The service fabric of the delivery platform. Every backend service (users, catalog,
//! orders, token authority) runs as a Tokio task that exclusively owns its state and is
//! reached only through a cloneable client over a bounded channel. That channel is the
//! service's RPC transport: a request goes in over `mpsc`, the answer comes back over
//! `oneshot`.
//!
//! ## Layers
//!
//! 1. **Entity layer** ([`ActorEntity`]): domain model and lifecycle hooks of a stored resource.
//! 2. **Runtime layer** ([`ResourceActor`], [`ServiceActor`]): message processing.
//! 3. **Interface layer** ([`ResourceClient`], [`ServiceClient`], [`ActorClient`]): typed calls.
//!
//! ## Failure model
//!
//! A call either gets a definitive answer from the service or fails with a transport error
//! ([`FrameworkError::ActorClosed`], [`FrameworkError::ActorDropped`],
//! [`FrameworkError::DeadlineExceeded`]). Callers decide what a missing answer means; the
//! framework never turns one into a default value.
//!
//! ## Deadlines
//!
//! Clients carry an optional per-call timeout (set when wiring) and accept a propagated
//! [`Deadline`] per request. A call gives up at whichever comes first and drops its
//! in-flight future, so an abandoned request upstream never leaks work downstream.
//!
//! ```rust
//! use delivery_actors::{ActorEntity, Deadline, FrameworkError, ResourceActor};
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! #[derive(Clone, Debug)] struct Dish { id: u32, name: String }
//! #[derive(Debug)] struct DishCreate { name: String }
//! #[derive(Debug)] struct DishNamed(String);
//! #[derive(Debug, thiserror::Error)] #[error("dish error")] struct DishError;
//!
//! #[async_trait]
//! impl ActorEntity for Dish {
//!     type Id = u32;
//!     type Create = DishCreate;
//!     type Update = ();
//!     type Action = ();
//!     type ActionResult = ();
//!     type Query = DishNamed;
//!     type Context = ();
//!     type Error = DishError;
//!
//!     fn from_create_params(id: u32, params: DishCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, name: params.name })
//!     }
//!     fn matches(&self, query: &DishNamed) -> bool { self.name == query.0 }
//!     async fn on_update(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), FrameworkError> {
//!     let (actor, client) = ResourceActor::<Dish>::new(10);
//!     let client = client.with_call_timeout(Duration::from_secs(5));
//!     tokio::spawn(actor.run(()));
//!
//!     let deadline = Deadline::after(Duration::from_secs(1));
//!     let id = client.with_deadline(deadline).create(DishCreate { name: "Tacos".into() }).await?;
//!     let found = client.query(DishNamed("Tacos".into())).await?;
//!     assert_eq!(found[0].id, id);
//!     Ok(())
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] stands in for a running actor behind a real `ResourceClient`, with
//! scripted answers and injected failures. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod deadline;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod service;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use deadline::Deadline;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response, ServiceRequest};
pub use service::{ActorService, ServiceActor, ServiceClient};

/// Last path segment of a type name, used as the `entity_type` log field.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or("Unknown")
}
