//! Error types for the Order actor.

use crate::model::OrderStatus;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderStoreError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The order's current status does not allow the requested move.
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The aggregate handed to the store breaks an order invariant.
    #[error("Order invariant violated: {0}")]
    InvariantViolation(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderStoreError {
    fn from(msg: String) -> Self {
        OrderStoreError::ActorCommunicationError(msg)
    }
}
