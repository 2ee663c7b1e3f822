use crate::model::{Role, UserId};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;
use std::fmt;

/// Identity established by a valid token. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    pub sub: UserId,
    pub email: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    pub fn has_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }
}

/// What a user presents to log in.
#[derive(Debug)]
pub struct Credential {
    pub email: String,
    pub password: SecretString,
}

/// A freshly signed token with the claims it carries.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"[REDACTED]")
            .field("claims", &self.claims)
            .finish()
    }
}
