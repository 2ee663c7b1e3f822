//! # Order Orchestrator
//!
//! Places orders and drives their status. Placement is the only flow that touches three
//! services (token authority, catalog, order store), so the sequencing lives here:
//!
//! ```text
//! place_order
//!   ├─ header shape check            (no RPC on a malformed header)
//!   ├─ try_join! ─┬─ authenticate    (token authority)
//!   │             └─ merge+validate  (catalog)
//!   ├─ role check  CUSTOMER | ADMIN
//!   └─ insert                         (order store)
//! ```
//!
//! Whichever concurrent branch fails first aborts the other. A caller with a bad token may
//! therefore still see a validation error if the catalog answered first; catalog data is not
//! secret, and nothing is persisted without a verified identity.

use super::{
    CatalogQuery, CreateOrderError, ManageOrderError, OrderItemRequest, OrderItems,
    OrderRepository, OrderValidator, ValidatedOrder,
};
use crate::auth::{authorize, authorize_subject, AuthDelegate, AuthError, Claims};
use crate::model::{
    DeliveryInfo, MerchantId, Order, OrderCreate, OrderId, OrderLine, OrderQuery, OrderReceipt,
    OrderStatus, Role,
};
use crate::order_actor::OrderAction;
use delivery_actors::Deadline;
use std::sync::Arc;
use tracing::{info, instrument};

/// Roles allowed to place orders.
const ORDERING_ROLES: &[Role] = &[Role::Customer, Role::Admin];

/// Roles allowed to confirm orders and read a restaurant's orders. Merchants are not checked
/// against the order's merchant; only an admin can create merchant accounts.
const CONFIRMING_ROLES: &[Role] = &[Role::Merchant, Role::Admin];

pub struct OrderOrchestrator {
    validator: OrderValidator,
    orders: Arc<dyn OrderRepository>,
}

impl OrderOrchestrator {
    pub fn new(catalog: Arc<dyn CatalogQuery>, orders: Arc<dyn OrderRepository>) -> Self {
        Self {
            validator: OrderValidator::new(catalog),
            orders,
        }
    }

    /// Validates and persists an order for an already authenticated caller.
    #[instrument(skip_all, fields(client_id = %claims.sub))]
    pub async fn create_order(
        &self,
        claims: &Claims,
        delivery: DeliveryInfo,
        items: &OrderItems,
        deadline: Deadline,
    ) -> Result<OrderReceipt, CreateOrderError> {
        authorize(claims, ORDERING_ROLES)?;
        let validated = self.validator.validate(&items.quantities(), deadline).await?;
        self.persist(claims, delivery, items, validated, deadline)
            .await
    }

    /// The gateway path: authenticates `header` and validates `requests` concurrently.
    #[instrument(skip_all, fields(lines = requests.len()))]
    pub async fn place_order(
        &self,
        auth: &AuthDelegate,
        header: Option<&str>,
        delivery: DeliveryInfo,
        requests: Vec<OrderItemRequest>,
        deadline: Deadline,
    ) -> Result<OrderReceipt, CreateOrderError> {
        AuthDelegate::parse_bearer(header)?;

        let identify = async move {
            auth.authenticate(header, deadline)
                .await
                .map_err(CreateOrderError::from)
        };
        let check = async move {
            let items = OrderItems::merge(requests)?;
            let validated = self.validator.validate(&items.quantities(), deadline).await?;
            Ok::<_, CreateOrderError>((items, validated))
        };
        let (claims, (items, validated)) = tokio::try_join!(identify, check)?;

        authorize(&claims, ORDERING_ROLES)?;
        self.persist(&claims, delivery, &items, validated, deadline)
            .await
    }

    async fn persist(
        &self,
        claims: &Claims,
        delivery: DeliveryInfo,
        items: &OrderItems,
        validated: ValidatedOrder,
        deadline: Deadline,
    ) -> Result<OrderReceipt, CreateOrderError> {
        let lines = validated
            .items
            .into_iter()
            .map(|line| OrderLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                comment: items.comment(line.product_id).map(str::to_string),
            })
            .collect();
        let params = OrderCreate {
            client_id: claims.sub,
            delivery,
            merchant_id: validated.merchant_id,
            items: lines,
            total_cost: validated.total_cost,
        };

        let order_id = self.orders.insert(params, deadline).await?;
        info!(
            %order_id,
            client_id = %claims.sub,
            merchant_id = %validated.merchant_id,
            total_cost = %validated.total_cost,
            "Order placed"
        );
        Ok(OrderReceipt {
            order_id,
            status: OrderStatus::Created,
        })
    }

    /// The order, if the caller owns it or is a merchant or admin.
    #[instrument(skip(self, claims, deadline))]
    pub async fn get_order(
        &self,
        claims: &Claims,
        id: OrderId,
        deadline: Deadline,
    ) -> Result<Order, ManageOrderError> {
        let order = self
            .orders
            .find(id, deadline)
            .await?
            .ok_or(ManageOrderError::NotFound(id))?;

        if order.client_id != claims.sub && !claims.has_role(&[Role::Merchant, Role::Admin]) {
            return Err(AuthError::Forbidden.into());
        }
        Ok(order)
    }

    /// An admin sees every order; anyone else sees their own.
    #[instrument(skip_all, fields(user_id = %claims.sub))]
    pub async fn list_orders(
        &self,
        claims: &Claims,
        deadline: Deadline,
    ) -> Result<Vec<Order>, ManageOrderError> {
        let query = match claims.role {
            Role::Admin => OrderQuery::All,
            _ => OrderQuery::ByClient(claims.sub),
        };
        Ok(self.orders.list(query, deadline).await?)
    }

    /// The restaurant dashboard: every order placed with `merchant_id`.
    #[instrument(skip(self, claims, deadline))]
    pub async fn orders_for_merchant(
        &self,
        claims: &Claims,
        merchant_id: MerchantId,
        deadline: Deadline,
    ) -> Result<Vec<Order>, ManageOrderError> {
        authorize(claims, CONFIRMING_ROLES)?;
        Ok(self
            .orders
            .list(OrderQuery::ByMerchant(merchant_id), deadline)
            .await?)
    }

    #[instrument(skip(self, claims, deadline))]
    pub async fn confirm_order(
        &self,
        claims: &Claims,
        id: OrderId,
        deadline: Deadline,
    ) -> Result<OrderStatus, ManageOrderError> {
        authorize(claims, CONFIRMING_ROLES)?;
        let status = self
            .orders
            .transition(id, OrderAction::Confirm, deadline)
            .await?;
        info!(%id, by = %claims.sub, "Order confirmed");
        Ok(status)
    }

    /// Cancels an order on behalf of its owner or an admin.
    #[instrument(skip(self, claims, deadline))]
    pub async fn cancel_order(
        &self,
        claims: &Claims,
        id: OrderId,
        reason: Option<String>,
        deadline: Deadline,
    ) -> Result<OrderStatus, ManageOrderError> {
        let order = self
            .orders
            .find(id, deadline)
            .await?
            .ok_or(ManageOrderError::NotFound(id))?;
        authorize_subject(claims, order.client_id)?;

        let status = self
            .orders
            .transition(id, OrderAction::Cancel { reason }, deadline)
            .await?;
        info!(%id, by = %claims.sub, "Order cancelled");
        Ok(status)
    }
}
