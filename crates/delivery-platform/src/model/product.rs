//! Catalog products and the merchants that sell them.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display};

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

/// The seller (restaurant) a product belongs to. Every order has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantId(pub u32);

impl Display for MerchantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "merchant_{}", self.0)
    }
}

/// A product as owned by the catalog service.
///
/// # Actor Framework
/// Managed by the catalog actor; see [`crate::catalog_actor`]. Other services only ever see
/// point-in-time copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub merchant_id: MerchantId,
    pub name: String,
    pub description: String,
    /// Never negative.
    pub price: Decimal,
    pub available: bool,
    pub category: String,
}

/// DTO for Product creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub merchant_id: MerchantId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub category: String,
}

fn default_available() -> bool {
    true
}

/// DTO for Product updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
}

/// Filters understood by the catalog actor.
#[derive(Debug, Clone)]
pub enum ProductQuery {
    ByIds(BTreeSet<ProductId>),
    ByMerchant(MerchantId),
}
