//! # Authentication & Authorization
//!
//! Identity on the platform is a bearer token issued by the **token authority** and checked on
//! every protected request by the **auth delegate**:
//!
//! ```text
//! gateway ──Authorization: Bearer t──▶ AuthDelegate ──validate_token(t)──▶ TokenAuthority
//!                                           │                                 (AuthService)
//!                                           ◀────────── Claims | AuthError ───────┘
//! ```
//!
//! The delegate never trusts the header on its own and never caches an answer. If the authority
//! does not answer within the call timeout the request is refused (fail closed).
//!
//! Collaborators are traits so tests can swap them:
//!
//! - [`TokenAuthority`] - issue and validate tokens. Server side: [`AuthService`]; client side:
//!   [`AuthClient`](crate::clients::AuthClient).
//! - [`UserDirectory`] - look a user up by email during login. Production:
//!   [`UserClient`](crate::clients::UserClient).

pub mod authority;
pub mod claims;
pub mod clock;
pub mod codec;
pub mod delegate;
pub mod error;
pub mod password;

pub use authority::{AuthReply, AuthRequest, AuthService};
pub use claims::{Claims, Credential, IssuedToken};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::ClaimsCodec;
pub use delegate::{authorize, authorize_subject, AuthDelegate};
pub use error::AuthError;

use crate::error::UpstreamError;
use crate::model::User;
use async_trait::async_trait;
use delivery_actors::Deadline;
use mockall::automock;

/// Issues and validates bearer tokens.
#[automock]
#[async_trait]
pub trait TokenAuthority: Send + Sync {
    /// Verifies the credential and signs fresh claims for it.
    async fn issue_token(
        &self,
        credential: Credential,
        deadline: Deadline,
    ) -> Result<IssuedToken, AuthError>;

    /// Checks signature and expiry of `token`.
    async fn validate_token(&self, token: &str, deadline: Deadline) -> Result<Claims, AuthError>;
}

/// Read access to user accounts, as the token authority needs it.
#[automock]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` when no account uses `email`.
    async fn get_user_by_email(
        &self,
        email: &str,
        deadline: Deadline,
    ) -> Result<Option<User>, UpstreamError>;
}
