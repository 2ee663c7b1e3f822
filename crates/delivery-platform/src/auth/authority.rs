//! # Token Authority Service
//!
//! [`AuthService`] verifies credentials against the user directory and issues signed claims;
//! it also validates tokens presented later. It owns no store, so it runs as a
//! [`ServiceActor`](delivery_actors::ServiceActor) and is reached through
//! [`AuthClient`](crate::clients::AuthClient).
//!
//! Tokens cannot be revoked: a token stays valid until `expires_at`, even if the account is
//! deleted in the meantime.

use super::clock::Clock;
use super::codec::ClaimsCodec;
use super::password;
use super::{AuthError, Claims, Credential, IssuedToken, TokenAuthority, UserDirectory};
use async_trait::async_trait;
use chrono::{Duration, SubsecRound};
use delivery_actors::{ActorService, Deadline};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    codec: ClaimsCodec,
    clock: Arc<dyn Clock>,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        codec: ClaimsCodec,
        clock: Arc<dyn Clock>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            directory,
            codec,
            clock,
            token_ttl,
        }
    }
}

#[async_trait]
impl TokenAuthority for AuthService {
    #[instrument(skip_all, fields(email = %credential.email))]
    async fn issue_token(
        &self,
        credential: Credential,
        deadline: Deadline,
    ) -> Result<IssuedToken, AuthError> {
        let user = self
            .directory
            .get_user_by_email(&credential.email, deadline)
            .await
            .map_err(|e| AuthError::UpstreamUnavailable(e.to_string()))?;

        let Some(user) = user else {
            debug!("Unknown email");
            return Err(AuthError::Unauthenticated);
        };

        let verified = password::verify_secret(credential.password, user.password_hash.clone())
            .await
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;
        if !verified {
            debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::Unauthenticated);
        }

        let issued_at = self.clock.now().trunc_subsecs(0);
        let claims = Claims {
            sub: user.id,
            email: user.email,
            role: user.role,
            issued_at,
            expires_at: issued_at + self.token_ttl,
        };
        let token = self.codec.sign(&claims)?;

        info!(user_id = %claims.sub, role = %claims.role, "Token issued");
        Ok(IssuedToken { token, claims })
    }

    async fn validate_token(&self, token: &str, _deadline: Deadline) -> Result<Claims, AuthError> {
        let claims = self.codec.verify(token)?;
        if self.clock.now() >= claims.expires_at {
            debug!(user_id = %claims.sub, "Token expired");
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}

// =============================================================================
// SERVICE ACTOR PROTOCOL
// =============================================================================

/// Messages the auth service answers over its mailbox.
pub enum AuthRequest {
    Login {
        credential: Credential,
        deadline: Deadline,
    },
    ValidateToken {
        token: String,
        deadline: Deadline,
    },
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { credential, .. } => f
                .debug_struct("Login")
                .field("email", &credential.email)
                .finish_non_exhaustive(),
            Self::ValidateToken { .. } => f
                .debug_struct("ValidateToken")
                .field("token", &"[REDACTED]")
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug)]
pub enum AuthReply {
    Issued(IssuedToken),
    Validated(Claims),
}

#[async_trait]
impl ActorService for AuthService {
    type Request = AuthRequest;
    type Response = Result<AuthReply, AuthError>;

    async fn handle(&self, request: AuthRequest) -> Self::Response {
        match request {
            AuthRequest::Login {
                credential,
                deadline,
            } => self
                .issue_token(credential, deadline)
                .await
                .map(AuthReply::Issued),
            AuthRequest::ValidateToken { token, deadline } => self
                .validate_token(&token, deadline)
                .await
                .map(AuthReply::Validated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ManualClock, MockUserDirectory};
    use crate::error::UpstreamError;
    use crate::model::{Role, User, UserId};
    use chrono::{TimeZone, Utc};
    use secrecy::SecretString;

    const SECRET: &str = "unit-test-signing-secret-0123456789abcdef";

    fn rosa(password_hash: String) -> User {
        User {
            id: UserId(5),
            email: "rosa@example.com".into(),
            password_hash,
            name: "Rosa".into(),
            phone: "555-0100".into(),
            role: Role::Customer,
        }
    }

    fn credential(password: &str) -> Credential {
        Credential {
            email: "rosa@example.com".into(),
            password: SecretString::from(password.to_string()),
        }
    }

    fn service(directory: MockUserDirectory, clock: Arc<ManualClock>) -> AuthService {
        AuthService::new(
            Arc::new(directory),
            ClaimsCodec::new(&SecretString::from(SECRET.to_string())),
            clock,
            Duration::hours(1),
        )
    }

    fn deadline() -> Deadline {
        Deadline::after(std::time::Duration::from_secs(5))
    }

    #[tokio::test]
    async fn login_then_validate_until_expiry() {
        let hash = password::hash_password("hunter2hunter2").unwrap();
        let mut directory = MockUserDirectory::new();
        directory
            .expect_get_user_by_email()
            .times(1)
            .returning(move |_, _| Ok(Some(rosa(hash.clone()))));

        let start = Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let service = service(directory, clock.clone());

        let issued = service
            .issue_token(credential("hunter2hunter2"), deadline())
            .await
            .unwrap();
        assert_eq!(issued.claims.sub, UserId(5));
        assert_eq!(issued.claims.expires_at, start + Duration::hours(1));

        let claims = service
            .validate_token(&issued.token, deadline())
            .await
            .unwrap();
        assert_eq!(claims, issued.claims);

        clock.advance(Duration::minutes(59));
        assert!(service.validate_token(&issued.token, deadline()).await.is_ok());

        clock.advance(Duration::minutes(1));
        assert_eq!(
            service
                .validate_token(&issued.token, deadline())
                .await
                .unwrap_err(),
            AuthError::TokenExpired
        );
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_look_the_same() {
        let mut empty = MockUserDirectory::new();
        empty
            .expect_get_user_by_email()
            .times(1)
            .returning(|_, _| Ok(None));

        let hash = password::hash_password("hunter2hunter2").unwrap();
        let mut populated = MockUserDirectory::new();
        populated
            .expect_get_user_by_email()
            .times(1)
            .returning(move |_, _| Ok(Some(rosa(hash.clone()))));

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let unknown = service(empty, clock.clone())
            .issue_token(credential("hunter2hunter2"), deadline())
            .await
            .unwrap_err();
        let mismatch = service(populated, clock)
            .issue_token(credential("wrong-password"), deadline())
            .await
            .unwrap_err();
        assert_eq!(unknown, AuthError::Unauthenticated);
        assert_eq!(mismatch, AuthError::Unauthenticated);
    }

    #[tokio::test]
    async fn directory_outage_is_upstream_unavailable() {
        let mut directory = MockUserDirectory::new();
        directory.expect_get_user_by_email().returning(|_, _| {
            Err(UpstreamError::DeadlineExceeded {
                service: "user-service",
            })
        });

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let err = service(directory, clock)
            .issue_token(credential("hunter2hunter2"), deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UpstreamUnavailable(_)));
    }
}
