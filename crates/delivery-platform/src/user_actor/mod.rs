//! # User Actor
//!
//! The user service: account records keyed by [`UserId`](crate::model::UserId), looked up by
//! email during login.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](delivery_actors::ActorEntity) implementation for [`User`]
//! - [`error`] - [`UserError`] type for type-safe error handling
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use delivery_platform::clients::UserClient;
//! use delivery_platform::model::{Role, UserCreate};
//! use delivery_platform::user_actor;
//! use delivery_actors::Deadline;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = user_actor::new(32);
//!     let client = UserClient::new(generic_client);
//!
//!     // No dependencies, so the context is ()
//!     tokio::spawn(actor.run(()));
//!
//!     let params = UserCreate {
//!         email: "alice@example.com".to_string(),
//!         password_hash: "$argon2id$...".to_string(),
//!         name: "Alice".to_string(),
//!         phone: "555-0100".to_string(),
//!         role: Role::Customer,
//!     };
//!     let deadline = Deadline::after(Duration::from_secs(1));
//!     let id = client.create_user(params, deadline).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Key Features
//!
//! - **No dependencies**: Context = ()
//! - **Unique emails**: duplicate registrations fail with [`UserError::AlreadyExists`]
//! - **No plaintext passwords**: only argon2 hashes ever reach the actor

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::User;
use delivery_actors::{ResourceActor, ResourceClient};

/// Creates a new User actor and its client.
pub fn new(mailbox_size: usize) -> (ResourceActor<User>, ResourceClient<User>) {
    ResourceActor::new(mailbox_size)
}
