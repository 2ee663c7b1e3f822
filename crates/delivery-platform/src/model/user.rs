use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Type-safe identifier for Users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user_{}", self.0)
    }
}

/// What a user is allowed to do. Carried in token claims and checked per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Customer,
    Merchant,
    Courier,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Customer => "CUSTOMER",
            Self::Merchant => "MERCHANT",
            Self::Courier => "COURIER",
            Self::Admin => "ADMIN",
        };
        f.write_str(name)
    }
}

/// A registered account.
///
/// # Actor Framework
/// Managed by the user actor through [`ActorEntity`](delivery_actors::ActorEntity); see
/// [`crate::user_actor`]. The password is only ever held as an argon2 PHC string.
#[derive(Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .finish()
    }
}

/// Payload for creating a new user. The password must already be hashed.
#[derive(Clone)]
pub struct UserCreate {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
}

impl fmt::Debug for UserCreate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCreate")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .finish()
    }
}

/// Partial update of a user's profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Filters understood by the user actor.
#[derive(Debug, Clone)]
pub enum UserQuery {
    /// Exact match on the normalized email.
    ByEmail(String),
    All,
}

/// Lower-cased, trimmed form under which emails are stored and looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
