//! # Service Clients
//!
//! Type-safe wrappers that hide message passing behind domain methods. Each wraps the generic
//! client of one actor and, where the platform needs it, implements the collaborator trait the
//! consumer depends on:
//!
//! | Client | Actor | Implements |
//! |---|---|---|
//! | [`UserClient`] | user | [`UserDirectory`](crate::auth::UserDirectory) |
//! | [`CatalogClient`] | catalog | [`CatalogQuery`](crate::ordering::CatalogQuery) |
//! | [`OrderClient`] | order | [`OrderRepository`](crate::ordering::OrderRepository) |
//! | [`AuthClient`] | token authority | [`TokenAuthority`](crate::auth::TokenAuthority) |
//!
//! All methods take a [`Deadline`](delivery_actors::Deadline) and give up once it passes.

pub mod auth_client;
pub mod catalog_client;
pub mod order_client;
pub mod user_client;

pub use auth_client::AuthClient;
pub use catalog_client::CatalogClient;
pub use order_client::OrderClient;
pub use user_client::UserClient;
