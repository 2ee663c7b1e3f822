//! [`ActorEntity`] implementation for [`Order`].
//!
//! The store is the last line of defence for the aggregate: whatever the orchestrator sends,
//! `from_create_params` refuses an order that has no lines, repeats a product, holds a zero
//! quantity or whose total does not add up.

use super::{OrderAction, OrderContext, OrderStoreError};
use crate::model::{Order, OrderCreate, OrderId, OrderLine, OrderQuery, OrderStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use delivery_actors::ActorEntity;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

fn check_lines(lines: &[OrderLine], total_cost: Decimal) -> Result<(), OrderStoreError> {
    if lines.is_empty() {
        return Err(OrderStoreError::InvariantViolation(
            "order has no items".into(),
        ));
    }

    let mut seen = BTreeSet::new();
    let mut sum = Decimal::ZERO;
    for line in lines {
        if !seen.insert(line.product_id) {
            return Err(OrderStoreError::InvariantViolation(format!(
                "{} appears more than once",
                line.product_id
            )));
        }
        if line.quantity == 0 {
            return Err(OrderStoreError::InvariantViolation(format!(
                "{} has quantity 0",
                line.product_id
            )));
        }
        sum = line
            .unit_price
            .checked_mul(Decimal::from(line.quantity))
            .and_then(|cost| sum.checked_add(cost))
            .ok_or_else(|| OrderStoreError::InvariantViolation("total overflows".into()))?;
    }

    if sum != total_cost {
        return Err(OrderStoreError::InvariantViolation(format!(
            "total {total_cost} does not match items ({sum})"
        )));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = ();
    type Action = OrderAction;
    type ActionResult = OrderStatus;
    type Query = OrderQuery;
    type Context = OrderContext;
    type Error = OrderStoreError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        check_lines(&params.items, params.total_cost)?;
        let delivery = params.delivery;
        Ok(Self {
            id,
            client_id: params.client_id,
            client_name: delivery.client_name,
            client_phone: delivery.client_phone,
            delivery_address: delivery.address,
            lat: delivery.lat,
            lng: delivery.lng,
            merchant_id: params.merchant_id,
            items: params.items,
            total_cost: params.total_cost,
            status: OrderStatus::Created,
            // Stamped from the actor's clock in on_create
            created_at: DateTime::<Utc>::default(),
            cancellation_reason: None,
        })
    }

    fn matches(&self, query: &OrderQuery) -> bool {
        match query {
            OrderQuery::ByClient(client_id) => self.client_id == *client_id,
            OrderQuery::ByMerchant(merchant_id) => self.merchant_id == *merchant_id,
            OrderQuery::All => true,
        }
    }

    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), Self::Error> {
        self.created_at = ctx.clock.now();
        Ok(())
    }

    async fn on_update(&mut self, _update: (), _ctx: &OrderContext) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &OrderContext,
    ) -> Result<OrderStatus, Self::Error> {
        let to = action.target();
        let next = self
            .status
            .transition_to(to)
            .ok_or(OrderStoreError::InvalidTransition {
                from: self.status,
                to,
            })?;

        if let OrderAction::Cancel { reason } = action {
            self.cancellation_reason = reason;
        }
        self.status = next;
        Ok(next)
    }
}
