//! Order placement and status changes.

use crate::auth::AuthDelegate;
use crate::gateway::error::Result;
use crate::gateway::extract::{RequestDeadline, RequireAuth};
use crate::gateway::state::AppState;
use crate::model::{DeliveryInfo, MerchantId, Order, OrderId, OrderReceipt, OrderStatus};
use crate::ordering::OrderItemRequest;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(flatten)]
    pub delivery: DeliveryInfo,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// `POST /orders`
///
/// The bearer header is checked for shape before the body is looked at, so an anonymous
/// caller gets 401 even with a broken body. Authentication and validation then run
/// concurrently inside the orchestrator.
#[instrument(skip_all)]
pub async fn place(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    headers: HeaderMap,
    body: std::result::Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderReceipt>)> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    AuthDelegate::parse_bearer(header)?;

    let Json(request) = body?;
    let receipt = state
        .orders
        .place_order(&state.auth, header, request.delivery, request.items, deadline)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// `GET /orders`
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    RequestDeadline(deadline): RequestDeadline,
) -> Result<Json<Vec<Order>>> {
    let orders = state.orders.list_orders(&claims, deadline).await?;
    Ok(Json(orders))
}

/// `GET /merchants/{id}/orders`
pub async fn merchant_orders(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    RequestDeadline(deadline): RequestDeadline,
    Path(merchant_id): Path<MerchantId>,
) -> Result<Json<Vec<Order>>> {
    let orders = state
        .orders
        .orders_for_merchant(&claims, merchant_id, deadline)
        .await?;
    Ok(Json(orders))
}

/// `GET /orders/{id}`
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    RequestDeadline(deadline): RequestDeadline,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = state.orders.get_order(&claims, id, deadline).await?;
    Ok(Json(order))
}

/// `POST /orders/{id}/confirm`
#[instrument(skip(state, claims, deadline))]
pub async fn confirm(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    RequestDeadline(deadline): RequestDeadline,
    Path(id): Path<OrderId>,
) -> Result<Json<StatusResponse>> {
    let status = state.orders.confirm_order(&claims, id, deadline).await?;
    Ok(Json(StatusResponse {
        order_id: id,
        status,
    }))
}

/// `POST /orders/{id}/cancel`
///
/// The body is optional; an empty body cancels without a reason.
#[instrument(skip(state, claims, deadline, body))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    RequestDeadline(deadline): RequestDeadline,
    Path(id): Path<OrderId>,
    body: std::result::Result<Json<CancelRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => CancelRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    let status = state
        .orders
        .cancel_order(&claims, id, request.reason, deadline)
        .await?;
    Ok(Json(StatusResponse {
        order_id: id,
        status,
    }))
}
