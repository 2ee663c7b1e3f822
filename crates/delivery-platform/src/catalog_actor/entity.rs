//! [`ActorEntity`] implementation for [`Product`].

use super::{CatalogAction, CatalogError};
use crate::model::{Product, ProductCreate, ProductId, ProductQuery, ProductUpdate};
use async_trait::async_trait;
use delivery_actors::ActorEntity;
use rust_decimal::Decimal;

fn checked_price(price: Decimal) -> Result<Decimal, CatalogError> {
    if price < Decimal::ZERO {
        return Err(CatalogError::NegativePrice(price));
    }
    Ok(price)
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = CatalogAction;
    type ActionResult = bool;
    type Query = ProductQuery;
    type Context = ();
    type Error = CatalogError;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(CatalogError::ValidationError(
                "name must not be empty".into(),
            ));
        }
        Ok(Self {
            id,
            merchant_id: params.merchant_id,
            name: params.name,
            description: params.description,
            price: checked_price(params.price)?,
            available: params.available,
            category: params.category,
        })
    }

    fn matches(&self, query: &ProductQuery) -> bool {
        match query {
            ProductQuery::ByIds(ids) => ids.contains(&self.id),
            ProductQuery::ByMerchant(merchant_id) => self.merchant_id == *merchant_id,
        }
    }

    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(price) = update.price {
            self.price = checked_price(price)?;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CatalogAction,
        _ctx: &(),
    ) -> Result<bool, Self::Error> {
        match action {
            CatalogAction::SetAvailability(available) => {
                self.available = available;
                Ok(self.available)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MerchantId;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    fn params(price: Decimal) -> ProductCreate {
        ProductCreate {
            merchant_id: MerchantId(7),
            name: "Pad thai".into(),
            description: String::new(),
            price,
            available: true,
            category: "noodles".into(),
        }
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = Product::from_create_params(ProductId(1), params(dec!(-0.01))).unwrap_err();
        assert_eq!(err, CatalogError::NegativePrice(dec!(-0.01)));
        assert!(Product::from_create_params(ProductId(1), params(dec!(0))).is_ok());
    }

    #[tokio::test]
    async fn negative_price_update_keeps_old_price() {
        let mut product = Product::from_create_params(ProductId(1), params(dec!(9.50))).unwrap();
        let update = ProductUpdate {
            price: Some(dec!(-1)),
            ..Default::default()
        };
        assert!(product.on_update(update, &()).await.is_err());
        assert_eq!(product.price, dec!(9.50));
    }

    #[test]
    fn query_by_ids_and_merchant() {
        let product = Product::from_create_params(ProductId(3), params(dec!(4))).unwrap();
        let wanted: BTreeSet<_> = [ProductId(1), ProductId(3)].into();
        assert!(product.matches(&ProductQuery::ByIds(wanted)));
        assert!(!product.matches(&ProductQuery::ByIds([ProductId(2)].into())));
        assert!(product.matches(&ProductQuery::ByMerchant(MerchantId(7))));
        assert!(!product.matches(&ProductQuery::ByMerchant(MerchantId(8))));
    }
}
