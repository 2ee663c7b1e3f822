//! Custom actions for the Order actor: the status state machine.

use crate::model::OrderStatus;

/// Status changes an order accepts. Both are only legal from `CREATED`.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    Confirm,
    Cancel { reason: Option<String> },
}

impl OrderAction {
    /// The status this action moves an order to.
    pub fn target(&self) -> OrderStatus {
        match self {
            Self::Confirm => OrderStatus::Confirmed,
            Self::Cancel { .. } => OrderStatus::Cancelled,
        }
    }
}
