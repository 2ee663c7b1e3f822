//! # Ordering
//!
//! Turning an untrusted order request into a persisted [`Order`]:
//!
//! - [`items`] - request lines and their per-product merge
//! - [`validator`] - catalog-backed validation and pricing
//! - [`orchestrator`] - authentication, validation and persistence of one order, plus the
//!   confirm/cancel state changes
//! - [`error`] - one error enum per outcome
//!
//! The orchestrator reaches the catalog and the order store only through [`CatalogQuery`] and
//! [`OrderRepository`], so tests can replace either with a mock.

pub mod error;
pub mod items;
pub mod orchestrator;
pub mod validator;

pub use error::*;
pub use items::{ItemLine, OrderItemRequest, OrderItems};
pub use orchestrator::OrderOrchestrator;
pub use validator::{OrderValidator, ValidatedLine, ValidatedOrder};

use crate::error::{PersistenceError, UpstreamError};
use crate::model::{Order, OrderCreate, OrderId, OrderQuery, OrderStatus, Product, ProductId};
use crate::order_actor::OrderAction;
use async_trait::async_trait;
use delivery_actors::Deadline;
use mockall::automock;

/// Batched product lookup.
#[automock]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// Products for `ids`. Unknown ids are simply absent from the answer.
    async fn get_products_by_ids(
        &self,
        ids: &[ProductId],
        deadline: Deadline,
    ) -> Result<Vec<Product>, UpstreamError>;
}

/// Persistence of the order aggregate.
#[automock]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: OrderCreate, deadline: Deadline)
        -> Result<OrderId, PersistenceError>;

    async fn find(&self, id: OrderId, deadline: Deadline)
        -> Result<Option<Order>, PersistenceError>;

    /// Orders matching `query`, in id order.
    async fn list(&self, query: OrderQuery, deadline: Deadline)
        -> Result<Vec<Order>, PersistenceError>;

    /// Applies a status change and returns the new status.
    async fn transition(
        &self,
        id: OrderId,
        action: OrderAction,
        deadline: Deadline,
    ) -> Result<OrderStatus, TransitionError>;
}
