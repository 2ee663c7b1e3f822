//! # ActorClient Trait
//!
//! Common surface for resource-specific clients: default `get`, `delete` and `find` built on
//! the wrapped [`ResourceClient`], each bounded by the caller's [`Deadline`].
use crate::{ActorEntity, Deadline, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit standard read/delete operations.
///
/// # Example
///
/// ```rust
/// use delivery_actors::{ActorClient, ActorEntity, Deadline, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
/// use std::time::Duration;
///
/// #[derive(Clone, Debug)] struct Courier { id: u32, active: bool }
/// #[derive(Debug)] struct CourierCreate;
/// #[derive(Debug)] struct ActiveCouriers;
/// #[derive(Debug, thiserror::Error)] #[error("{0}")] struct CourierError(String);
///
/// #[async_trait]
/// impl ActorEntity for Courier {
///     type Id = u32;
///     type Create = CourierCreate;
///     type Update = ();
///     type Action = ();
///     type ActionResult = ();
///     type Query = ActiveCouriers;
///     type Context = ();
///     type Error = CourierError;
///
///     fn from_create_params(id: u32, _: CourierCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, active: true })
///     }
///     fn matches(&self, _: &ActiveCouriers) -> bool { self.active }
///     async fn on_update(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// struct CourierClient {
///     inner: ResourceClient<Courier>,
/// }
///
/// #[async_trait]
/// impl ActorClient<Courier> for CourierClient {
///     type Error = CourierError;
///
///     fn inner(&self) -> &ResourceClient<Courier> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         CourierError(e.to_string())
///     }
/// }
///
/// async fn usage(client: CourierClient) {
///     let deadline = Deadline::after(Duration::from_secs(2));
///     let _ = client.get(1, deadline).await;
///     let _ = client.find(ActiveCouriers, deadline).await;
///     let _ = client.delete(1, deadline).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self, deadline))]
    async fn get(&self, id: T::Id, deadline: Deadline) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner()
            .with_deadline(deadline)
            .get(id)
            .await
            .map_err(Self::map_error)
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self, deadline))]
    async fn delete(&self, id: T::Id, deadline: Deadline) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner()
            .with_deadline(deadline)
            .delete(id)
            .await
            .map_err(Self::map_error)
    }

    /// Every entity matching `query`, in id order.
    #[tracing::instrument(skip(self, deadline))]
    async fn find(&self, query: T::Query, deadline: Deadline) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner()
            .with_deadline(deadline)
            .query(query)
            .await
            .map_err(Self::map_error)
    }
}
