//! Request extractors for authentication and deadlines.

use super::error::ApiError;
use super::state::AppState;
use crate::auth::Claims;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use delivery_actors::Deadline;
use std::convert::Infallible;

/// Extractor that requires a valid bearer token.
///
/// The token is checked with the token authority on every request. A missing or malformed
/// header is refused without a downstream call.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(claims): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", claims.email)
/// }
/// ```
pub struct RequireAuth(pub Claims);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequestDeadline(deadline) = RequestDeadline::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let claims = state.auth.authenticate(header, deadline).await?;
        Ok(Self(claims))
    }
}

/// The deadline of the current request, as stamped by
/// [`stamp_deadline`](super::middleware::stamp_deadline).
///
/// Falls back to a fresh deadline from the configured request timeout when the middleware
/// is not installed.
#[derive(Debug, Clone, Copy)]
pub struct RequestDeadline(pub Deadline);

impl FromRequestParts<AppState> for RequestDeadline {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let deadline = parts
            .extensions
            .get::<Deadline>()
            .copied()
            .unwrap_or_else(|| Deadline::after(state.request_timeout));
        Ok(Self(deadline))
    }
}
