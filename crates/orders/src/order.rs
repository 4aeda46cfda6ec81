//! Order aggregate: root plus owned line items.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{OrderId, RepositoryError, RepositoryResult, ShippingAddress};

use crate::reference::{Customer, Employee, Product, Shipper};

/// Aggregate root: a sales order.
///
/// `id` is 0 while the order is transient; it becomes durable (and receives
/// a store-generated identity) only through the add operation. Line items
/// are owned exclusively by the order and have no lifecycle outside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub employee: Employee,
    pub shipper: Shipper,
    pub order_date: DateTime<Utc>,
    pub required_date: DateTime<Utc>,
    pub shipped_date: Option<DateTime<Utc>>,
    /// Non-negative by convention; the schema stores whatever is supplied.
    pub freight: f64,
    pub ship_name: String,
    pub shipping_address: ShippingAddress,
    pub details: Vec<OrderDetail>,
}

/// A line item, owned exclusively by its order.
///
/// `order_id` is the structural back-reference to the owner. It exists for
/// navigation only and is excluded from serialization, so a detail produced
/// standalone can never recurse into its order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(skip)]
    pub order_id: OrderId,
    pub product: Product,
    pub unit_price: f64,
    pub quantity: i64,
    pub discount: f64,
}

impl Order {
    /// Check every line item against the write invariants.
    ///
    /// Runs before any row is touched: a violation anywhere in the set
    /// means no partial write. The uniqueness check mirrors the composite
    /// key of the persisted line-item table.
    pub fn validate_details(&self) -> RepositoryResult<()> {
        let mut seen = HashSet::with_capacity(self.details.len());

        for detail in &self.details {
            if detail.product.id.get() <= 0 {
                return Err(RepositoryError::validation(
                    "product id must be greater than zero",
                ));
            }

            if detail.unit_price < 0.0 {
                return Err(RepositoryError::validation(
                    "unit price must be greater than or equal to zero",
                ));
            }

            if detail.quantity <= 0 {
                return Err(RepositoryError::validation(
                    "quantity must be greater than zero",
                ));
            }

            if !(0.0..=1.0).contains(&detail.discount) {
                return Err(RepositoryError::validation(
                    "discount must be between 0 and 1",
                ));
            }

            if !seen.insert(detail.product.id) {
                return Err(RepositoryError::validation(format!(
                    "duplicate line item for product {}",
                    detail.product.id
                )));
            }
        }

        Ok(())
    }
}
