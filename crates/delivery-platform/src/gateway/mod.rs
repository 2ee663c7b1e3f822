//! # HTTP Gateway
//!
//! The public REST surface of the platform. Handlers stay thin: they extract, authorize and
//! delegate to the orchestrator or a service client, then map the outcome through
//! [`ApiError`].
//!
//! | Route | Access |
//! |---|---|
//! | `GET /health` | public |
//! | `POST /auth/login` | public |
//! | `POST /users` | public for CUSTOMER and COURIER; MERCHANT needs an admin token |
//! | `GET /users` | admin |
//! | `GET /users/{id}`, `PUT /users/{id}` | self or admin |
//! | `DELETE /users/{id}` | admin |
//! | `GET /orders` | own orders; admin sees all |
//! | `POST /orders` | customer or admin |
//! | `GET /orders/{id}` | owner, merchant or admin |
//! | `POST /orders/{id}/confirm` | merchant or admin |
//! | `POST /orders/{id}/cancel` | owner or admin |
//! | `GET /merchants/{id}/products` | public |
//! | `POST /merchants/{id}/products` | merchant or admin |
//! | `GET /merchants/{id}/orders` | merchant or admin |
//! | `PUT /products/{id}`, `PUT /products/{id}/availability` | merchant or admin |
//!
//! Every request carries a [`Deadline`](delivery_actors::Deadline) stamped by
//! [`middleware::stamp_deadline`].

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builds the gateway router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/users",
            get(handlers::users::list).post(handlers::users::register),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route(
            "/orders",
            get(handlers::orders::list).post(handlers::orders::place),
        )
        .route("/orders/{id}", get(handlers::orders::get))
        .route("/orders/{id}/confirm", post(handlers::orders::confirm))
        .route("/orders/{id}/cancel", post(handlers::orders::cancel))
        .route(
            "/merchants/{id}/products",
            get(handlers::catalog::merchant_products).post(handlers::catalog::add_product),
        )
        .route(
            "/merchants/{id}/orders",
            get(handlers::orders::merchant_orders),
        )
        .route("/products/{id}", put(handlers::catalog::update_product))
        .route(
            "/products/{id}/availability",
            put(handlers::catalog::set_availability),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn_with_state(state.clone(), middleware::stamp_deadline)),
        )
        .with_state(state)
}
