//! Plain data shared by every service: ids, entities and their create/update payloads.

pub mod order;
pub mod product;
pub mod user;

pub use order::*;
pub use product::*;
pub use user::*;
