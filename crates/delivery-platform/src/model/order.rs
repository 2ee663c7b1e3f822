/// A placed delivery order.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](delivery_actors::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](delivery_actors::ResourceActor).
///
/// See [`crate::order_actor`] for creation parameters ([`OrderCreate`]) and the status
/// transitions driven by [`OrderAction`](crate::order_actor::OrderAction).
use crate::model::{MerchantId, ProductId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Lifecycle of an order. `Created` is the only state that can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Created,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    /// The status reached by moving to `target`, or `None` if that move is not allowed.
    pub fn transition_to(self, target: OrderStatus) -> Option<OrderStatus> {
        match (self, target) {
            (Self::Created, Self::Confirmed) | (Self::Created, Self::Cancelled) => Some(target),
            _ => None,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "CREATED",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

/// Where and to whom an order is delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub client_name: String,
    pub client_phone: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

/// One product line of a persisted order. Prices come from the catalog, never the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub client_id: UserId,
    pub client_name: String,
    pub client_phone: String,
    pub delivery_address: String,
    pub lat: f64,
    pub lng: f64,
    pub merchant_id: MerchantId,
    pub items: Vec<OrderLine>,
    pub total_cost: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub cancellation_reason: Option<String>,
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub client_id: UserId,
    pub delivery: DeliveryInfo,
    pub merchant_id: MerchantId,
    pub items: Vec<OrderLine>,
    pub total_cost: Decimal,
}

/// Filters understood by the order actor.
#[derive(Debug, Clone)]
pub enum OrderQuery {
    ByClient(UserId),
    ByMerchant(MerchantId),
    All,
}

/// Answer to a successful order placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_created_orders_move() {
        use OrderStatus::*;

        assert_eq!(Created.transition_to(Confirmed), Some(Confirmed));
        assert_eq!(Created.transition_to(Cancelled), Some(Cancelled));
        assert_eq!(Created.transition_to(Created), None);
        assert_eq!(Confirmed.transition_to(Cancelled), None);
        assert_eq!(Cancelled.transition_to(Confirmed), None);
        assert_eq!(Confirmed.transition_to(Created), None);
    }

    #[test]
    fn status_serializes_upper_case() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
    }
}
