//! # Order Client
//!
//! Provides a high‑level API for interacting with the `Order` actor. It is the production
//! [`OrderRepository`]: validation and orchestration happen before anything reaches it.
use crate::error::PersistenceError;
use crate::model::{Order, OrderCreate, OrderId, OrderQuery, OrderStatus};
use crate::order_actor::{OrderAction, OrderStoreError};
use crate::ordering::{OrderRepository, TransitionError};
use async_trait::async_trait;
use delivery_actors::{ActorClient, Deadline, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderStoreError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderStoreError::NotFound(id),
            other => other
                .into_entity_error::<OrderStoreError>()
                .unwrap_or_else(|e| OrderStoreError::ActorCommunicationError(e.to_string())),
        }
    }
}

#[async_trait]
impl OrderRepository for OrderClient {
    #[instrument(skip_all, fields(client_id = %order.client_id))]
    async fn insert(
        &self,
        order: OrderCreate,
        deadline: Deadline,
    ) -> Result<OrderId, PersistenceError> {
        debug!("Sending request");
        self.inner
            .with_deadline(deadline)
            .create(order)
            .await
            .map_err(|e| PersistenceError(Self::map_error(e).to_string()))
    }

    #[instrument(skip(self, deadline))]
    async fn find(
        &self,
        id: OrderId,
        deadline: Deadline,
    ) -> Result<Option<Order>, PersistenceError> {
        debug!("Sending request");
        self.inner
            .with_deadline(deadline)
            .get(id)
            .await
            .map_err(|e| PersistenceError(Self::map_error(e).to_string()))
    }

    #[instrument(skip(self, deadline))]
    async fn list(
        &self,
        query: OrderQuery,
        deadline: Deadline,
    ) -> Result<Vec<Order>, PersistenceError> {
        debug!("Sending request");
        self.inner
            .with_deadline(deadline)
            .query(query)
            .await
            .map_err(|e| PersistenceError(Self::map_error(e).to_string()))
    }

    #[instrument(skip(self, deadline))]
    async fn transition(
        &self,
        id: OrderId,
        action: OrderAction,
        deadline: Deadline,
    ) -> Result<OrderStatus, TransitionError> {
        debug!("Sending request");
        self.inner
            .with_deadline(deadline)
            .perform_action(id, action)
            .await
            .map_err(|e| match Self::map_error(e) {
                OrderStoreError::NotFound(_) => TransitionError::NotFound(id),
                OrderStoreError::InvalidTransition { from, to } => {
                    TransitionError::InvalidTransition { from, to }
                }
                other => TransitionError::Persistence(PersistenceError(other.to_string())),
            })
    }
}
