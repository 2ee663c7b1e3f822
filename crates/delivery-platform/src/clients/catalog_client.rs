//! # Catalog Client
//!
//! Provides a high‑level API for interacting with the `Product` (catalog) actor, and is the
//! production [`CatalogQuery`] behind the order validator.
use crate::catalog_actor::{CatalogAction, CatalogError};
use crate::error::UpstreamError;
use crate::model::{MerchantId, Product, ProductCreate, ProductId, ProductQuery, ProductUpdate};
use crate::ordering::CatalogQuery;
use async_trait::async_trait;
use delivery_actors::{ActorClient, Deadline, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

const SERVICE: &str = "catalog-service";

/// Client for interacting with the catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<Product>,
}

impl CatalogClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, deadline))]
    pub async fn create_product(
        &self,
        params: ProductCreate,
        deadline: Deadline,
    ) -> Result<ProductId, CatalogError> {
        debug!("Sending request");
        self.inner
            .with_deadline(deadline)
            .create(params)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, deadline))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
        deadline: Deadline,
    ) -> Result<Product, CatalogError> {
        debug!("Sending request");
        self.inner
            .with_deadline(deadline)
            .update(id, update)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, deadline))]
    pub async fn set_availability(
        &self,
        id: ProductId,
        available: bool,
        deadline: Deadline,
    ) -> Result<bool, CatalogError> {
        debug!("Sending request");
        self.inner
            .with_deadline(deadline)
            .perform_action(id, CatalogAction::SetAvailability(available))
            .await
            .map_err(Self::map_error)
    }

    /// A merchant's products in id order.
    pub async fn products_by_merchant(
        &self,
        merchant_id: MerchantId,
        deadline: Deadline,
    ) -> Result<Vec<Product>, CatalogError> {
        self.find(ProductQuery::ByMerchant(merchant_id), deadline)
            .await
    }
}

#[async_trait]
impl ActorClient<Product> for CatalogClient {
    type Error = CatalogError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => CatalogError::NotFound(id),
            other => other
                .into_entity_error::<CatalogError>()
                .unwrap_or_else(|e| CatalogError::ActorCommunicationError(e.to_string())),
        }
    }
}

#[async_trait]
impl CatalogQuery for CatalogClient {
    #[instrument(skip(self, deadline))]
    async fn get_products_by_ids(
        &self,
        ids: &[ProductId],
        deadline: Deadline,
    ) -> Result<Vec<Product>, UpstreamError> {
        debug!("Sending request");
        self.inner
            .with_deadline(deadline)
            .query(ProductQuery::ByIds(ids.iter().copied().collect()))
            .await
            .map_err(|e| UpstreamError::from_framework(SERVICE, e))
    }
}
