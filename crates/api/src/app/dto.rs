//! Request/response DTOs and JSON mapping helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{CustomerCode, EmployeeId, OrderId, ProductId, ShipperId, ShippingAddress};
use orderdesk_orders::{Customer, Employee, Order, OrderDetail, Product, Shipper};

// -------------------------
// Request DTOs
// -------------------------

/// Flat order shape accepted on add/update: reference ids plus scalars.
/// Display fields are deliberately absent; the store derives them from the
/// referenced rows.
#[derive(Debug, Deserialize)]
pub struct BriefOrderRequest {
    pub customer_id: String,
    pub employee_id: i64,
    pub shipper_id: i64,
    pub order_date: DateTime<Utc>,
    pub required_date: DateTime<Utc>,
    #[serde(default)]
    pub shipped_date: Option<DateTime<Utc>>,
    pub freight: f64,
    pub ship_name: String,
    pub ship_address: String,
    pub ship_city: String,
    #[serde(default)]
    pub ship_region: Option<String>,
    pub ship_postal_code: String,
    pub ship_country: String,
    #[serde(default)]
    pub order_details: Vec<BriefOrderDetailRequest>,
}

#[derive(Debug, Deserialize)]
pub struct BriefOrderDetailRequest {
    pub product_id: i64,
    pub unit_price: f64,
    pub quantity: i64,
    pub discount: f64,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub count: Option<i64>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct AddOrderResponse {
    pub order_id: i64,
}

/// Listing view: flat scalars plus reference ids, no line items.
#[derive(Debug, Serialize)]
pub struct BriefOrderResponse {
    pub id: i64,
    pub customer_id: String,
    pub employee_id: i64,
    pub shipper_id: i64,
    pub order_date: DateTime<Utc>,
    pub required_date: DateTime<Utc>,
    pub shipped_date: Option<DateTime<Utc>>,
    pub freight: f64,
    pub ship_name: String,
    pub ship_address: String,
    pub ship_city: String,
    pub ship_region: Option<String>,
    pub ship_postal_code: String,
    pub ship_country: String,
}

/// Single-order view: nested references and every line item with joined
/// product, category and supplier names.
#[derive(Debug, Serialize)]
pub struct FullOrderResponse {
    pub id: i64,
    pub customer: CustomerView,
    pub employee: EmployeeView,
    pub shipper: ShipperView,
    pub order_date: DateTime<Utc>,
    pub required_date: DateTime<Utc>,
    pub shipped_date: Option<DateTime<Utc>>,
    pub freight: f64,
    pub ship_name: String,
    pub shipping_address: ShippingAddressView,
    pub order_details: Vec<FullOrderDetailView>,
}

#[derive(Debug, Serialize)]
pub struct CustomerView {
    pub code: String,
    pub company_name: String,
}

#[derive(Debug, Serialize)]
pub struct EmployeeView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
}

#[derive(Debug, Serialize)]
pub struct ShipperView {
    pub id: i64,
    pub company_name: String,
}

#[derive(Debug, Serialize)]
pub struct ShippingAddressView {
    pub address: String,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Serialize)]
pub struct FullOrderDetailView {
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub supplier: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub discount: f64,
}

// -------------------------
// Mapping helpers
// -------------------------

/// Build a domain order from the flat request shape.
///
/// Reference projections carry only the identifier here; display text is
/// re-derived by the store on read.
pub fn order_from_brief(req: BriefOrderRequest, id: OrderId) -> Order {
    let details = req
        .order_details
        .into_iter()
        .map(|detail| OrderDetail {
            order_id: id,
            product: Product::from_id(ProductId::new(detail.product_id)),
            unit_price: detail.unit_price,
            quantity: detail.quantity,
            discount: detail.discount,
        })
        .collect();

    Order {
        id,
        customer: Customer::from_code(CustomerCode::new(req.customer_id)),
        employee: Employee::from_id(EmployeeId::new(req.employee_id)),
        shipper: Shipper::from_id(ShipperId::new(req.shipper_id)),
        order_date: req.order_date,
        required_date: req.required_date,
        shipped_date: req.shipped_date,
        freight: req.freight,
        ship_name: req.ship_name,
        shipping_address: ShippingAddress {
            address: req.ship_address,
            city: req.ship_city,
            region: req.ship_region,
            postal_code: req.ship_postal_code,
            country: req.ship_country,
        },
        details,
    }
}

pub fn brief_order_response(order: &Order) -> BriefOrderResponse {
    BriefOrderResponse {
        id: order.id.get(),
        customer_id: order.customer.code.as_str().to_string(),
        employee_id: order.employee.id.get(),
        shipper_id: order.shipper.id.get(),
        order_date: order.order_date,
        required_date: order.required_date,
        shipped_date: order.shipped_date,
        freight: order.freight,
        ship_name: order.ship_name.clone(),
        ship_address: order.shipping_address.address.clone(),
        ship_city: order.shipping_address.city.clone(),
        ship_region: order.shipping_address.region.clone(),
        ship_postal_code: order.shipping_address.postal_code.clone(),
        ship_country: order.shipping_address.country.clone(),
    }
}

pub fn full_order_response(order: &Order) -> FullOrderResponse {
    FullOrderResponse {
        id: order.id.get(),
        customer: CustomerView {
            code: order.customer.code.as_str().to_string(),
            company_name: order.customer.company_name.clone(),
        },
        employee: EmployeeView {
            id: order.employee.id.get(),
            first_name: order.employee.first_name.clone(),
            last_name: order.employee.last_name.clone(),
            country: order.employee.country.clone(),
        },
        shipper: ShipperView {
            id: order.shipper.id.get(),
            company_name: order.shipper.company_name.clone(),
        },
        order_date: order.order_date,
        required_date: order.required_date,
        shipped_date: order.shipped_date,
        freight: order.freight,
        ship_name: order.ship_name.clone(),
        shipping_address: ShippingAddressView {
            address: order.shipping_address.address.clone(),
            city: order.shipping_address.city.clone(),
            region: order.shipping_address.region.clone(),
            postal_code: order.shipping_address.postal_code.clone(),
            country: order.shipping_address.country.clone(),
        },
        order_details: order
            .details
            .iter()
            .map(|detail| FullOrderDetailView {
                product_id: detail.product.id.get(),
                product_name: detail.product.product_name.clone(),
                category: detail.product.category.clone(),
                supplier: detail.product.supplier.clone(),
                unit_price: detail.unit_price,
                quantity: detail.quantity,
                discount: detail.discount,
            })
            .collect(),
    }
}
