use crate::auth::AuthError;
use crate::error::{PersistenceError, UpstreamError};
use crate::model::{MerchantId, OrderId, OrderStatus, ProductId};
use thiserror::Error;

fn join<T: std::fmt::Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The order itself is unacceptable. Lists of ids are sorted and free of duplicates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("order has no items")]
    EmptyOrder,

    #[error("invalid quantity {quantity} for {product_id}")]
    InvalidQuantity { product_id: ProductId, quantity: i64 },

    #[error("unknown products: {}", join(.ids))]
    MissingProduct { ids: Vec<ProductId> },

    #[error("products not available: {}", join(.ids))]
    ProductUnavailable { ids: Vec<ProductId> },

    #[error("products from more than one restaurant: {}", join(.merchants))]
    MixedRestaurant { merchants: Vec<MerchantId> },
}

/// Outcome of validation other than a `ValidatedOrder`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Why a status change was refused by the order store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("order not found: {0}")]
    NotFound(OrderId),
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CreateOrderError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<ValidationError> for CreateOrderError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::Order(e) => Self::Order(e),
            ValidationError::Upstream(e) => Self::Upstream(e),
        }
    }
}

/// Failures of reading, confirming or cancelling an existing order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ManageOrderError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("order not found: {0}")]
    NotFound(OrderId),
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<TransitionError> for ManageOrderError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::NotFound(id) => Self::NotFound(id),
            TransitionError::InvalidTransition { from, to } => Self::InvalidTransition { from, to },
            TransitionError::Persistence(e) => Self::Persistence(e),
        }
    }
}
