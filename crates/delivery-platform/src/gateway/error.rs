//! Unified error handling for the gateway.
//!
//! Every handler returns `Result<T, ApiError>`. Domain errors convert into an [`ApiError`]
//! carrying the HTTP status and a stable machine-readable code; the body is always
//!
//! ```json
//! {"error": "<code>", "message": "<text>", "details": <optional json>}
//! ```
//!
//! The cause of a server-side failure is logged when the conversion happens and never sent to
//! the client. Client errors are not logged.

use crate::auth::password::PasswordError;
use crate::auth::AuthError;
use crate::catalog_actor::CatalogError;
use crate::error::{PersistenceError, UpstreamError};
use crate::ordering::{CreateOrderError, ManageOrderError, OrderError};
use crate::user_actor::UserError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// The request ran out of time before an answer was assembled.
    pub fn deadline_exceeded() -> Self {
        Self::new(
            StatusCode::GATEWAY_TIMEOUT,
            "deadline_exceeded",
            "request did not complete in time",
        )
    }

    fn internal(message: &str) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "Internal server error",
        )
        .with_cause(message)
    }

    /// Keeps the cause out of the response body but in the logs.
    fn with_cause(self, cause: &str) -> Self {
        tracing::error!(code = self.code, cause, "Request failed");
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code,
            message: &self.message,
            details: self.details.as_ref(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

// =============================================================================
// Conversions
// =============================================================================

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let message = e.to_string();
        match e {
            AuthError::Unauthenticated => {
                Self::new(StatusCode::UNAUTHORIZED, "unauthenticated", message)
            }
            AuthError::TokenMalformed => {
                Self::new(StatusCode::UNAUTHORIZED, "token_malformed", message)
            }
            AuthError::TokenExpired => Self::new(StatusCode::UNAUTHORIZED, "token_expired", message),
            AuthError::TokenInvalidSignature => {
                Self::new(StatusCode::UNAUTHORIZED, "token_invalid_signature", message)
            }
            // Fail closed: no identity could be established.
            AuthError::UpstreamUnavailable(_) => Self::new(
                StatusCode::UNAUTHORIZED,
                "auth_unavailable",
                "authentication service unavailable",
            ),
            AuthError::Forbidden => Self::new(StatusCode::FORBIDDEN, "forbidden", message),
            AuthError::TokenIssue(cause) => Self::internal(&cause),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        let message = e.to_string();
        let (code, details) = match e {
            OrderError::EmptyOrder => ("empty_order", None),
            OrderError::InvalidQuantity {
                product_id,
                quantity,
            } => (
                "invalid_quantity",
                Some(json!({ "product_id": product_id, "quantity": quantity })),
            ),
            OrderError::MissingProduct { ids } => {
                ("missing_product", Some(json!({ "product_ids": ids })))
            }
            OrderError::ProductUnavailable { ids } => {
                ("product_unavailable", Some(json!({ "product_ids": ids })))
            }
            OrderError::MixedRestaurant { merchants } => {
                ("mixed_restaurant", Some(json!({ "merchant_ids": merchants })))
            }
        };
        let error = Self::new(StatusCode::UNPROCESSABLE_ENTITY, code, message);
        match details {
            Some(details) => error.with_details(details),
            None => error,
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(e: UpstreamError) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "upstream_unavailable",
            format!("{} unavailable", e.service()),
        )
        .with_details(json!({ "service": e.service() }))
        .with_cause(&e.to_string())
    }
}

impl From<PersistenceError> for ApiError {
    fn from(e: PersistenceError) -> Self {
        Self::internal(&e.0)
    }
}

impl From<CreateOrderError> for ApiError {
    fn from(e: CreateOrderError) -> Self {
        match e {
            CreateOrderError::Auth(e) => e.into(),
            CreateOrderError::Order(e) => e.into(),
            CreateOrderError::Upstream(e) => e.into(),
            CreateOrderError::Persistence(e) => e.into(),
        }
    }
}

impl From<ManageOrderError> for ApiError {
    fn from(e: ManageOrderError) -> Self {
        let message = e.to_string();
        match e {
            ManageOrderError::Auth(e) => e.into(),
            ManageOrderError::NotFound(_) => Self::not_found(message),
            ManageOrderError::InvalidTransition { from, to } => {
                Self::new(StatusCode::CONFLICT, "invalid_transition", message)
                    .with_details(json!({ "from": from, "to": to }))
            }
            ManageOrderError::Persistence(e) => e.into(),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        let message = e.to_string();
        match e {
            UserError::NotFound(_) => Self::not_found(message),
            UserError::AlreadyExists(_) => Self::new(StatusCode::CONFLICT, "email_taken", message),
            UserError::InvalidEmail(_) => Self::bad_request("invalid_email", message),
            UserError::ValidationError(_) => Self::bad_request("validation_failed", message),
            UserError::ActorCommunicationError(cause) => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream_unavailable",
                "user-service unavailable",
            )
            .with_cause(&cause),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        let message = e.to_string();
        match e {
            CatalogError::NotFound(_) => Self::not_found(message),
            CatalogError::NegativePrice(_) | CatalogError::ValidationError(_) => {
                Self::bad_request("validation_failed", message)
            }
            CatalogError::ActorCommunicationError(cause) => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream_unavailable",
                "catalog-service unavailable",
            )
            .with_cause(&cause),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::TooShort => Self::bad_request("weak_password", e.to_string()),
            other => Self::internal(&other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("invalid_body", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MerchantId, OrderStatus, ProductId};

    #[test]
    fn every_identity_failure_is_401() {
        for e in [
            AuthError::Unauthenticated,
            AuthError::TokenMalformed,
            AuthError::TokenExpired,
            AuthError::TokenInvalidSignature,
            AuthError::UpstreamUnavailable("timed out".into()),
        ] {
            assert_eq!(ApiError::from(e).status, StatusCode::UNAUTHORIZED);
        }
        assert_eq!(
            ApiError::from(AuthError::UpstreamUnavailable("x".into())).code,
            "auth_unavailable"
        );
        assert_eq!(
            ApiError::from(AuthError::Forbidden).status,
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn order_errors_carry_ids_in_details() {
        let err = ApiError::from(OrderError::MissingProduct {
            ids: vec![ProductId(3), ProductId(8)],
        });
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code, "missing_product");
        assert_eq!(err.details, Some(json!({ "product_ids": [3, 8] })));

        let err = ApiError::from(CreateOrderError::Order(OrderError::MixedRestaurant {
            merchants: vec![MerchantId(1), MerchantId(2)],
        }));
        assert_eq!(err.details, Some(json!({ "merchant_ids": [1, 2] })));
    }

    #[test]
    fn upstream_and_persistence_are_server_errors() {
        let upstream = ApiError::from(UpstreamError::DeadlineExceeded {
            service: "catalog-service",
        });
        assert_eq!(upstream.status, StatusCode::SERVICE_UNAVAILABLE);

        let persistence = ApiError::from(PersistenceError("disk full".into()));
        assert_eq!(persistence.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!persistence.message.contains("disk full"));
    }

    #[test]
    fn bad_transitions_conflict() {
        let err = ApiError::from(ManageOrderError::InvalidTransition {
            from: OrderStatus::Cancelled,
            to: OrderStatus::Confirmed,
        });
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(
            err.details,
            Some(json!({ "from": "CANCELLED", "to": "CONFIRMED" }))
        );
    }
}
