//! Deadline middleware.
//!
//! Every inbound request gets a [`Deadline`] of `request_timeout` from arrival. It is stored in
//! the request extensions for [`RequestDeadline`](super::extract::RequestDeadline) and handed
//! to every downstream call. If the handler is still running when the deadline passes, its
//! future is dropped and the client receives 504.

use super::error::ApiError;
use super::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use delivery_actors::Deadline;
use tracing::warn;

pub async fn stamp_deadline(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let deadline = Deadline::after(state.request_timeout);
    request.extensions_mut().insert(deadline);

    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    match tokio::time::timeout_at(deadline.instant(), next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(
                %method,
                path = %path,
                timeout_ms = state.request_timeout.as_millis() as u64,
                "Request deadline exceeded"
            );
            ApiError::deadline_exceeded().into_response()
        }
    }
}
