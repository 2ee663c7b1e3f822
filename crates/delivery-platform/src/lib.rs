//! # Delivery Platform
//!
//! Backend core of a food-delivery platform: customers order from one restaurant at a time,
//! merchants confirm, and every protected call is authenticated against a token authority.
//!
//! ## Components
//!
//! - **[model]**: Data structures ([`User`](model::User), [`Product`](model::Product),
//!   [`Order`](model::Order)) that implement the `ActorEntity` trait.
//! - **[user_actor]**, **[catalog_actor]**, **[order_actor]**: The stateful services.
//! - **[auth]**: Token authority, auth delegate, password hashing.
//! - **[ordering]**: Order validation against the catalog and the placement flow.
//! - **[clients]**: Type-safe wrappers (e.g., [`UserClient`](clients::UserClient)) that hide
//!   the message passing.
//! - **[gateway]**: The REST surface.
//! - **[lifecycle]**: Starting, wiring and stopping everything.
//! - **[config]**: Environment configuration.
//!
//! ## Testing
//!
//! Collaborator traits ([`CatalogQuery`](ordering::CatalogQuery),
//! [`OrderRepository`](ordering::OrderRepository), [`TokenAuthority`](auth::TokenAuthority),
//! [`UserDirectory`](auth::UserDirectory)) come with `mockall` mocks; actor clients can be
//! tested against [`delivery_actors::mock`].

pub mod auth;
pub mod catalog_actor;
pub mod clients;
pub mod config;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod ordering;
pub mod user_actor;
