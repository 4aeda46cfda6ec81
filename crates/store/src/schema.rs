//! Normalized table shapes.
//!
//! These structs mirror the relational schema row for row and carry no
//! domain behavior; the mapper translates between them and the aggregate.
//! The line-item table is keyed by the composite (order id, product id).

use chrono::{DateTime, Utc};

use orderdesk_core::{CategoryId, CustomerCode, EmployeeId, OrderId, ProductId, ShipperId, SupplierId};

/// `orders` row. `ship_via` is the shipper foreign key (legacy column name).
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub order_id: OrderId,
    pub customer_id: CustomerCode,
    pub employee_id: EmployeeId,
    pub order_date: DateTime<Utc>,
    pub required_date: DateTime<Utc>,
    pub shipped_date: Option<DateTime<Utc>>,
    pub ship_via: ShipperId,
    pub freight: f64,
    pub ship_name: String,
    pub ship_address: String,
    pub ship_city: String,
    pub ship_region: Option<String>,
    pub ship_postal_code: String,
    pub ship_country: String,
}

/// `order_details` row; primary key is (order_id, product_id).
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetailRow {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub unit_price: f64,
    pub quantity: i64,
    pub discount: f64,
}

/// `customers` row.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRow {
    pub customer_id: CustomerCode,
    pub company_name: String,
}

/// `employees` row (the columns the order core reads).
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRow {
    pub employee_id: EmployeeId,
    pub last_name: String,
    pub first_name: String,
    pub country: Option<String>,
}

/// `shippers` row.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipperRow {
    pub shipper_id: ShipperId,
    pub company_name: String,
}

/// `products` row (the columns the order core reads).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub product_id: ProductId,
    pub product_name: String,
    pub supplier_id: SupplierId,
    pub category_id: CategoryId,
}

/// `categories` row.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    pub category_id: CategoryId,
    pub category_name: String,
}

/// `suppliers` row.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierRow {
    pub supplier_id: SupplierId,
    pub company_name: String,
}

/// An order row with its top-level references joined in (brief reads).
#[derive(Debug, Clone, PartialEq)]
pub struct OrderHead {
    pub order: OrderRow,
    pub customer: CustomerRow,
    pub employee: EmployeeRow,
    pub shipper: ShipperRow,
}

/// A detail row with product, category and supplier joined in.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailWithProduct {
    pub detail: OrderDetailRow,
    pub product: ProductRow,
    pub category: CategoryRow,
    pub supplier: SupplierRow,
}

/// The full join graph for one order (full reads).
#[derive(Debug, Clone, PartialEq)]
pub struct OrderGraph {
    pub head: OrderHead,
    pub details: Vec<DetailWithProduct>,
}
