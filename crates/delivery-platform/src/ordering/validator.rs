//! # Order Validator
//!
//! Checks a product → quantity map against catalog data and prices it. The client's view of
//! products (existence, price, restaurant) is never trusted; everything comes from a single
//! batched [`CatalogQuery`] call.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. no items → [`OrderError::EmptyOrder`]
//! 2. a quantity below 1 (or beyond `u32`) → [`OrderError::InvalidQuantity`], smallest id
//! 3. ids the catalog does not know → [`OrderError::MissingProduct`]
//! 4. products switched off → [`OrderError::ProductUnavailable`]
//! 5. more than one merchant → [`OrderError::MixedRestaurant`]
//!
//! The catalog call is only made once steps 1 and 2 pass.

use super::{CatalogQuery, OrderError, ValidationError};
use crate::model::{MerchantId, Product, ProductId};
use delivery_actors::Deadline;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A priced line of a validated order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// An order the catalog vouches for: one merchant, every product available, trusted total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub merchant_id: MerchantId,
    pub total_cost: Decimal,
    /// Ascending product id.
    pub items: Vec<ValidatedLine>,
}

#[derive(Clone)]
pub struct OrderValidator {
    catalog: Arc<dyn CatalogQuery>,
}

impl OrderValidator {
    pub fn new(catalog: Arc<dyn CatalogQuery>) -> Self {
        Self { catalog }
    }

    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn validate(
        &self,
        items: &HashMap<ProductId, i64>,
        deadline: Deadline,
    ) -> Result<ValidatedOrder, ValidationError> {
        if items.is_empty() {
            return Err(OrderError::EmptyOrder.into());
        }

        let requested: BTreeMap<ProductId, i64> = items.iter().map(|(id, q)| (*id, *q)).collect();
        let mut quantities = BTreeMap::new();
        for (&product_id, &quantity) in &requested {
            let quantity = u32::try_from(quantity)
                .ok()
                .filter(|q| *q >= 1)
                .ok_or(OrderError::InvalidQuantity {
                    product_id,
                    quantity,
                })?;
            quantities.insert(product_id, quantity);
        }

        let ids: Vec<ProductId> = quantities.keys().copied().collect();
        let returned = self.catalog.get_products_by_ids(&ids, deadline).await?;
        debug!(requested = ids.len(), returned = returned.len(), "Catalog answered");

        let mut found: BTreeMap<ProductId, Product> = BTreeMap::new();
        for product in returned {
            if quantities.contains_key(&product.id) {
                found.entry(product.id).or_insert(product);
            }
        }

        let missing: Vec<ProductId> = ids
            .iter()
            .filter(|id| !found.contains_key(id))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(OrderError::MissingProduct { ids: missing }.into());
        }

        let unavailable: Vec<ProductId> = found
            .values()
            .filter(|p| !p.available)
            .map(|p| p.id)
            .collect();
        if !unavailable.is_empty() {
            return Err(OrderError::ProductUnavailable { ids: unavailable }.into());
        }

        let merchants: BTreeSet<MerchantId> = found.values().map(|p| p.merchant_id).collect();
        let merchant_id = match merchants.first() {
            Some(&only) if merchants.len() == 1 => only,
            _ => {
                return Err(OrderError::MixedRestaurant {
                    merchants: merchants.into_iter().collect(),
                }
                .into())
            }
        };

        let mut total_cost = Decimal::ZERO;
        let mut lines = Vec::with_capacity(found.len());
        for (product_id, product) in found {
            let quantity = quantities[&product_id];
            let overflow = || OrderError::InvalidQuantity {
                product_id,
                quantity: i64::from(quantity),
            };
            let cost = product
                .price
                .checked_mul(Decimal::from(quantity))
                .ok_or_else(overflow)?;
            total_cost = total_cost.checked_add(cost).ok_or_else(overflow)?;
            lines.push(ValidatedLine {
                product_id,
                quantity,
                unit_price: product.price,
            });
        }

        Ok(ValidatedOrder {
            merchant_id,
            total_cost,
            items: lines,
        })
    }
}
