//! # User Client
//!
//! Provides a high‑level API for interacting with the `User` actor.
//! It wraps a `ResourceClient<User>` and exposes domain‑specific methods.
//! It is also the production [`UserDirectory`] used by the token authority.
use crate::auth::UserDirectory;
use crate::error::UpstreamError;
use crate::model::{User, UserCreate, UserId, UserQuery, UserUpdate};
use crate::user_actor::UserError;
use async_trait::async_trait;
use delivery_actors::{ActorClient, Deadline, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

const SERVICE: &str = "user-service";

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, deadline))]
    pub async fn create_user(
        &self,
        params: UserCreate,
        deadline: Deadline,
    ) -> Result<UserId, UserError> {
        debug!("Sending request");
        self.inner
            .with_deadline(deadline)
            .create(params)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, deadline))]
    pub async fn update_user(
        &self,
        id: UserId,
        update: UserUpdate,
        deadline: Deadline,
    ) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner
            .with_deadline(deadline)
            .update(id, update)
            .await
            .map_err(Self::map_error)
    }

    /// Every account, in id order.
    pub async fn list_users(&self, deadline: Deadline) -> Result<Vec<User>, UserError> {
        self.find(UserQuery::All, deadline).await
    }
}

#[async_trait]
impl ActorClient<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    /// Domain rejections keep their meaning; everything else is a communication failure.
    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            other => other
                .into_entity_error::<UserError>()
                .unwrap_or_else(|e| UserError::ActorCommunicationError(e.to_string())),
        }
    }
}

#[async_trait]
impl UserDirectory for UserClient {
    #[instrument(skip(self, deadline))]
    async fn get_user_by_email(
        &self,
        email: &str,
        deadline: Deadline,
    ) -> Result<Option<User>, UpstreamError> {
        debug!("Sending request");
        let mut found = self
            .inner
            .with_deadline(deadline)
            .query(UserQuery::ByEmail(email.to_string()))
            .await
            .map_err(|e| UpstreamError::from_framework(SERVICE, e))?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }
}
