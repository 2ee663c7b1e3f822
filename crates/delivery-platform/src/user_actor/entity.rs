//! [`ActorEntity`] implementation for [`User`].
//!
//! Emails are stored normalized (trimmed, lower-case) and are unique across the store;
//! uniqueness is enforced through [`ActorEntity::conflicts_with`], so a duplicate create or an
//! update onto a taken email is rejected before anything is written.

use super::UserError;
use crate::model::{normalize_email, User, UserCreate, UserId, UserQuery, UserUpdate};
use async_trait::async_trait;
use delivery_actors::ActorEntity;

fn checked_email(raw: &str) -> Result<String, UserError> {
    let email = normalize_email(raw);
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(UserError::InvalidEmail(raw.to_string()))
    }
}

#[async_trait]
impl ActorEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = ();
    type ActionResult = ();
    type Query = UserQuery;
    type Context = ();
    type Error = UserError;

    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(UserError::ValidationError("name must not be empty".into()));
        }
        Ok(Self {
            id,
            email: checked_email(&params.email)?,
            password_hash: params.password_hash,
            name: params.name,
            phone: params.phone,
            role: params.role,
        })
    }

    fn matches(&self, query: &UserQuery) -> bool {
        match query {
            UserQuery::ByEmail(email) => self.email == normalize_email(email),
            UserQuery::All => true,
        }
    }

    fn conflicts_with(&self, other: &Self) -> Option<Self::Error> {
        (self.email == other.email).then(|| UserError::AlreadyExists(self.email.clone()))
    }

    async fn on_update(&mut self, update: UserUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(email) = update.email {
            self.email = checked_email(&email)?;
        }
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(UserError::ValidationError("name must not be empty".into()));
            }
            self.name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}
