//! # Auth Client
//!
//! The caller side of the token authority. Wraps a [`ServiceClient`] for [`AuthService`] and
//! implements [`TokenAuthority`], so the gateway and the auth delegate never see the mailbox.
//! Any transport failure (service gone, reply dropped, deadline passed) becomes
//! [`AuthError::UpstreamUnavailable`].
use crate::auth::{
    AuthError, AuthReply, AuthRequest, AuthService, Claims, Credential, IssuedToken,
    TokenAuthority,
};
use async_trait::async_trait;
use delivery_actors::{Deadline, FrameworkError, ServiceClient};
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct AuthClient {
    inner: ServiceClient<AuthService>,
}

impl AuthClient {
    pub fn new(inner: ServiceClient<AuthService>) -> Self {
        Self { inner }
    }

    async fn call(&self, request: AuthRequest, deadline: Deadline) -> Result<AuthReply, AuthError> {
        self.inner
            .with_deadline(deadline)
            .call(request)
            .await
            .map_err(unavailable)?
    }
}

fn unavailable(e: FrameworkError) -> AuthError {
    warn!(error = %e, "Token authority unreachable");
    AuthError::UpstreamUnavailable(e.to_string())
}

fn unexpected(reply: AuthReply) -> AuthError {
    AuthError::UpstreamUnavailable(format!("unexpected reply from token authority: {reply:?}"))
}

#[async_trait]
impl TokenAuthority for AuthClient {
    #[instrument(skip_all, fields(email = %credential.email))]
    async fn issue_token(
        &self,
        credential: Credential,
        deadline: Deadline,
    ) -> Result<IssuedToken, AuthError> {
        debug!("Sending request");
        match self
            .call(
                AuthRequest::Login {
                    credential,
                    deadline,
                },
                deadline,
            )
            .await?
        {
            AuthReply::Issued(issued) => Ok(issued),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip_all)]
    async fn validate_token(&self, token: &str, deadline: Deadline) -> Result<Claims, AuthError> {
        debug!("Sending request");
        match self
            .call(
                AuthRequest::ValidateToken {
                    token: token.to_string(),
                    deadline,
                },
                deadline,
            )
            .await?
        {
            AuthReply::Validated(claims) => Ok(claims),
            other => Err(unexpected(other)),
        }
    }
}
