//! Menus: public listing, plus merchant-side maintenance.

use crate::auth::authorize;
use crate::gateway::error::Result;
use crate::gateway::extract::{RequestDeadline, RequireAuth};
use crate::gateway::state::AppState;
use crate::model::{MerchantId, Product, ProductCreate, ProductId, ProductUpdate, Role};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};

/// Roles that may change a menu.
const MENU_EDITORS: &[Role] = &[Role::Merchant, Role::Admin];

/// A new dish; the merchant comes from the path.
#[derive(Debug, Deserialize)]
pub struct NewProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default = "on_the_menu")]
    pub available: bool,
    #[serde(default)]
    pub category: String,
}

fn on_the_menu() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub product_id: ProductId,
    pub available: bool,
}

/// `GET /merchants/{id}/products`
///
/// Public menu of a merchant, unavailable products included, in id order.
pub async fn merchant_products(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    Path(merchant_id): Path<MerchantId>,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .catalog
        .products_by_merchant(merchant_id, deadline)
        .await?;
    Ok(Json(products))
}

/// `POST /merchants/{id}/products`
#[instrument(skip(state, claims, deadline, body))]
pub async fn add_product(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    RequestDeadline(deadline): RequestDeadline,
    Path(merchant_id): Path<MerchantId>,
    body: std::result::Result<Json<NewProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    authorize(&claims, MENU_EDITORS)?;
    let Json(request) = body?;

    let id = state
        .catalog
        .create_product(
            ProductCreate {
                merchant_id,
                name: request.name,
                description: request.description,
                price: request.price,
                available: request.available,
                category: request.category,
            },
            deadline,
        )
        .await?;
    info!(product_id = %id, by = %claims.sub, "Product added");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// `PUT /products/{id}`
#[instrument(skip(state, claims, deadline, body))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    RequestDeadline(deadline): RequestDeadline,
    Path(id): Path<ProductId>,
    body: std::result::Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Json<Product>> {
    authorize(&claims, MENU_EDITORS)?;
    let Json(update) = body?;
    let product = state.catalog.update_product(id, update, deadline).await?;
    Ok(Json(product))
}

/// `PUT /products/{id}/availability`
///
/// Orders that include an unavailable product are refused from the next request on.
#[instrument(skip(state, claims, deadline, body))]
pub async fn set_availability(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    RequestDeadline(deadline): RequestDeadline,
    Path(id): Path<ProductId>,
    body: std::result::Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<Json<AvailabilityResponse>> {
    authorize(&claims, MENU_EDITORS)?;
    let Json(request) = body?;
    let available = state
        .catalog
        .set_availability(id, request.available, deadline)
        .await?;
    info!(product_id = %id, available, by = %claims.sub, "Availability changed");
    Ok(Json(AvailabilityResponse {
        product_id: id,
        available,
    }))
}
