//! # Platform Lifecycle
//!
//! Starting, wiring and stopping the backend services, plus the data seeded at startup.
//!
//! [`DeliveryPlatform::start`] creates every actor before any of them runs, then injects the
//! clients each one needs. Nothing is global: the gateway receives its collaborators through
//! [`AppState`](crate::gateway::AppState).
//!
//! Shutdown follows the channel-closure pattern of the actor framework: drop every client,
//! each actor sees its mailbox close, drains, and its task ends. The dependency graph is
//! acyclic (only the auth service holds another service's client), so closure always
//! completes.
//!
//! Logging is set up once with [`setup_tracing`], filtered by `RUST_LOG`.

pub mod platform;
pub mod seed;

pub use delivery_actors::tracing::setup_tracing;
pub use platform::DeliveryPlatform;
pub use seed::{bootstrap, SeedError};
