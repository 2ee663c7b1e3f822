//! Route handlers, one module per resource.

pub mod auth;
pub mod catalog;
pub mod health;
pub mod orders;
pub mod users;
