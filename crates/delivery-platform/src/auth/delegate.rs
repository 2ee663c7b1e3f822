//! # Auth Delegate
//!
//! Turns the raw `Authorization` header of an inbound request into [`Claims`] by asking the
//! [`TokenAuthority`]. Nothing is cached: every protected request costs one validation call.

use super::{AuthError, Claims, TokenAuthority};
use crate::model::{Role, UserId};
use delivery_actors::Deadline;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct AuthDelegate {
    authority: Arc<dyn TokenAuthority>,
    call_timeout: Duration,
}

impl AuthDelegate {
    pub fn new(authority: Arc<dyn TokenAuthority>, call_timeout: Duration) -> Self {
        Self {
            authority,
            call_timeout,
        }
    }

    /// Extracts the token from `Bearer <token>`.
    ///
    /// The header must be exactly two space-separated parts, the first being `Bearer` and the
    /// second non-empty. Anything else, including a missing header, is `TokenMalformed`.
    pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthError> {
        let header = header.ok_or(AuthError::TokenMalformed)?;
        let mut parts = header.split(' ');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
            _ => Err(AuthError::TokenMalformed),
        }
    }

    /// Validates the bearer token in `header`.
    ///
    /// A malformed header is refused without contacting the authority. The call is bounded by
    /// the earlier of `deadline` and the configured call timeout; running out of time, or the
    /// authority being unreachable, refuses the request.
    #[instrument(skip_all)]
    pub async fn authenticate(
        &self,
        header: Option<&str>,
        deadline: Deadline,
    ) -> Result<Claims, AuthError> {
        let token = Self::parse_bearer(header)?;
        let bounded = deadline.clamp(self.call_timeout);
        let budget_ms = bounded.remaining().as_millis() as u64;

        match tokio::time::timeout_at(
            bounded.instant(),
            self.authority.validate_token(token, bounded),
        )
        .await
        {
            Ok(Ok(claims)) => {
                debug!(user_id = %claims.sub, role = %claims.role, "Authenticated");
                Ok(claims)
            }
            Ok(Err(e)) => {
                debug!(error = %e, "Token refused");
                Err(e)
            }
            Err(_) => {
                warn!(budget_ms, "Token authority timed out");
                Err(AuthError::UpstreamUnavailable(
                    "token authority did not answer in time".into(),
                ))
            }
        }
    }
}

/// `Forbidden` unless the caller's role is one of `allowed`.
pub fn authorize(claims: &Claims, allowed: &[Role]) -> Result<(), AuthError> {
    if claims.has_role(allowed) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// `Forbidden` unless the caller is `subject` or an admin.
pub fn authorize_subject(claims: &Claims, subject: UserId) -> Result<(), AuthError> {
    if claims.sub == subject || claims.role == Role::Admin {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
