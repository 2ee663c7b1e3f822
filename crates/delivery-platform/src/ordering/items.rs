//! Untrusted order lines as the client sends them, and their merge into one line per product.

use super::OrderError;
use crate::model::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One line of an order request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(default)]
    pub comment: Option<String>,
    /// Accepted on the wire and ignored: prices always come from the catalog.
    #[serde(default)]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLine {
    pub quantity: i64,
    pub comment: Option<String>,
}

/// Requested quantities keyed by product, one entry per distinct product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderItems {
    lines: BTreeMap<ProductId, ItemLine>,
}

impl OrderItems {
    /// Merges request lines that name the same product.
    ///
    /// Every line must carry a quantity of at least 1; the smallest offending product id is
    /// reported otherwise. Quantities of repeated products are summed and their comments are
    /// joined with `"; "` in request order.
    pub fn merge(requests: Vec<OrderItemRequest>) -> Result<Self, OrderError> {
        if let Some(bad) = requests
            .iter()
            .filter(|r| r.quantity < 1)
            .min_by_key(|r| r.product_id)
        {
            return Err(OrderError::InvalidQuantity {
                product_id: bad.product_id,
                quantity: bad.quantity,
            });
        }

        let mut lines: BTreeMap<ProductId, ItemLine> = BTreeMap::new();
        for request in requests {
            let comment = request.comment.filter(|c| !c.trim().is_empty());
            match lines.get_mut(&request.product_id) {
                Some(line) => {
                    line.quantity = line.quantity.checked_add(request.quantity).ok_or(
                        OrderError::InvalidQuantity {
                            product_id: request.product_id,
                            quantity: request.quantity,
                        },
                    )?;
                    line.comment = match (line.comment.take(), comment) {
                        (Some(a), Some(b)) => Some(format!("{a}; {b}")),
                        (a, b) => a.or(b),
                    };
                }
                None => {
                    lines.insert(
                        request.product_id,
                        ItemLine {
                            quantity: request.quantity,
                            comment,
                        },
                    );
                }
            }
        }
        Ok(Self { lines })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn comment(&self, product_id: ProductId) -> Option<&str> {
        self.lines
            .get(&product_id)
            .and_then(|line| line.comment.as_deref())
    }

    /// The product → quantity map the validator works on.
    pub fn quantities(&self) -> HashMap<ProductId, i64> {
        self.lines
            .iter()
            .map(|(id, line)| (*id, line.quantity))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product: u32, quantity: i64, comment: Option<&str>) -> OrderItemRequest {
        OrderItemRequest {
            product_id: ProductId(product),
            quantity,
            comment: comment.map(str::to_string),
            price: None,
        }
    }

    #[test]
    fn duplicates_are_summed_and_comments_joined() {
        let items = OrderItems::merge(vec![
            item(4, 1, Some("no onions")),
            item(2, 3, None),
            item(4, 2, Some("extra sauce")),
        ])
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items.quantities()[&ProductId(4)], 3);
        assert_eq!(items.quantities()[&ProductId(2)], 3);
        assert_eq!(items.comment(ProductId(4)), Some("no onions; extra sauce"));
        assert_eq!(items.comment(ProductId(2)), None);
    }

    #[test]
    fn every_line_is_checked_before_merging() {
        // 5 + (-2) would be positive, but the negative line alone is invalid.
        let err = OrderItems::merge(vec![item(7, 5, None), item(7, -2, None), item(3, 0, None)])
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidQuantity {
                product_id: ProductId(3),
                quantity: 0,
            }
        );
    }

    #[test]
    fn summing_past_i64_is_invalid() {
        let err = OrderItems::merge(vec![item(1, i64::MAX, None), item(1, 1, None)]).unwrap_err();
        assert!(matches!(err, OrderError::InvalidQuantity { .. }));
    }

    #[test]
    fn client_price_is_accepted_and_ignored() {
        let json = r#"{"product_id": 3, "quantity": 2, "price": "0.01"}"#;
        let request: OrderItemRequest = serde_json::from_str(json).unwrap();
        let items = OrderItems::merge(vec![request]).unwrap();
        assert_eq!(items.quantities()[&ProductId(3)], 2);
    }
}
