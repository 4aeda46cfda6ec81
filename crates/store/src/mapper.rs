//! Row/aggregate translation.
//!
//! Reads denormalize joined display text into the aggregate's reference
//! projections. Writes renormalize: only the foreign-key scalars survive,
//! and any caller-supplied display text is dropped, since the store derives
//! display text from the referenced rows rather than from the aggregate.

use orderdesk_core::{OrderId, ShippingAddress};
use orderdesk_orders::{Customer, Employee, Order, OrderDetail, Product, Shipper};

use crate::schema::{DetailWithProduct, OrderDetailRow, OrderGraph, OrderHead, OrderRow};

/// Brief projection: top-level references only, no line items.
pub fn brief_order(head: OrderHead) -> Order {
    order_shell(head)
}

/// Full projection: brief plus every line item with product, category and
/// supplier names folded in, ordered by product id.
pub fn full_order(graph: OrderGraph) -> Order {
    let mut order = order_shell(graph.head);
    let mut details = graph.details;
    details.sort_by_key(|joined| joined.detail.product_id);
    order.details = details
        .into_iter()
        .map(|joined| detail_from_rows(order.id, joined))
        .collect();
    order
}

fn order_shell(head: OrderHead) -> Order {
    let OrderHead {
        order,
        customer,
        employee,
        shipper,
    } = head;

    Order {
        id: order.order_id,
        customer: Customer {
            code: customer.customer_id,
            company_name: customer.company_name,
        },
        employee: Employee {
            id: employee.employee_id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            country: employee.country.unwrap_or_default(),
        },
        shipper: Shipper {
            id: shipper.shipper_id,
            company_name: shipper.company_name,
        },
        order_date: order.order_date,
        required_date: order.required_date,
        shipped_date: order.shipped_date,
        freight: order.freight,
        ship_name: order.ship_name,
        shipping_address: ShippingAddress {
            address: order.ship_address,
            city: order.ship_city,
            region: order.ship_region,
            postal_code: order.ship_postal_code,
            country: order.ship_country,
        },
        details: Vec::new(),
    }
}

fn detail_from_rows(owner: OrderId, joined: DetailWithProduct) -> OrderDetail {
    OrderDetail {
        order_id: owner,
        product: Product {
            id: joined.product.product_id,
            product_name: joined.product.product_name,
            category_id: joined.category.category_id,
            category: joined.category.category_name,
            supplier_id: joined.supplier.supplier_id,
            supplier: joined.supplier.company_name,
        },
        unit_price: joined.detail.unit_price,
        quantity: joined.detail.quantity,
        discount: joined.detail.discount,
    }
}

/// Renormalize an aggregate for writing.
///
/// `target` is the row identity to write under (0 for inserts, the existing
/// id for updates); the detail rows carry the same target so the store can
/// attach them to the owning order.
pub fn order_rows(order: &Order, target: OrderId) -> (OrderRow, Vec<OrderDetailRow>) {
    let row = OrderRow {
        order_id: target,
        customer_id: order.customer.code.clone(),
        employee_id: order.employee.id,
        order_date: order.order_date,
        required_date: order.required_date,
        shipped_date: order.shipped_date,
        ship_via: order.shipper.id,
        freight: order.freight,
        ship_name: order.ship_name.clone(),
        ship_address: order.shipping_address.address.clone(),
        ship_city: order.shipping_address.city.clone(),
        ship_region: order.shipping_address.region.clone(),
        ship_postal_code: order.shipping_address.postal_code.clone(),
        ship_country: order.shipping_address.country.clone(),
    };

    let details = order
        .details
        .iter()
        .map(|detail| OrderDetailRow {
            order_id: target,
            product_id: detail.product.id,
            unit_price: detail.unit_price,
            quantity: detail.quantity,
            discount: detail.discount,
        })
        .collect();

    (row, details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orderdesk_core::{CategoryId, CustomerCode, EmployeeId, ProductId, ShipperId, SupplierId};

    use crate::schema::{CategoryRow, CustomerRow, EmployeeRow, ProductRow, ShipperRow, SupplierRow};

    fn sample_head(order_id: i64) -> OrderHead {
        OrderHead {
            order: OrderRow {
                order_id: OrderId::new(order_id),
                customer_id: CustomerCode::new("ALFKI"),
                employee_id: EmployeeId::new(1),
                order_date: Utc::now(),
                required_date: Utc::now(),
                shipped_date: None,
                ship_via: ShipperId::new(2),
                freight: 32.38,
                ship_name: "Alfreds Futterkiste".to_string(),
                ship_address: "Obere Str. 57".to_string(),
                ship_city: "Berlin".to_string(),
                ship_region: None,
                ship_postal_code: "12209".to_string(),
                ship_country: "Germany".to_string(),
            },
            customer: CustomerRow {
                customer_id: CustomerCode::new("ALFKI"),
                company_name: "Alfreds Futterkiste".to_string(),
            },
            employee: EmployeeRow {
                employee_id: EmployeeId::new(1),
                last_name: "Davolio".to_string(),
                first_name: "Nancy".to_string(),
                country: None,
            },
            shipper: ShipperRow {
                shipper_id: ShipperId::new(2),
                company_name: "United Package".to_string(),
            },
        }
    }

    fn sample_joined(order_id: i64, product_id: i64) -> DetailWithProduct {
        DetailWithProduct {
            detail: OrderDetailRow {
                order_id: OrderId::new(order_id),
                product_id: ProductId::new(product_id),
                unit_price: 10.0,
                quantity: 3,
                discount: 0.1,
            },
            product: ProductRow {
                product_id: ProductId::new(product_id),
                product_name: "Chai".to_string(),
                supplier_id: SupplierId::new(4),
                category_id: CategoryId::new(5),
            },
            category: CategoryRow {
                category_id: CategoryId::new(5),
                category_name: "Beverages".to_string(),
            },
            supplier: SupplierRow {
                supplier_id: SupplierId::new(4),
                company_name: "Exotic Liquids".to_string(),
            },
        }
    }

    #[test]
    fn brief_projection_omits_details() {
        let order = brief_order(sample_head(10));
        assert_eq!(order.id, OrderId::new(10));
        assert_eq!(order.customer.company_name, "Alfreds Futterkiste");
        assert_eq!(order.shipper.id, ShipperId::new(2));
        assert!(order.details.is_empty());
    }

    #[test]
    fn missing_employee_country_becomes_empty() {
        let order = brief_order(sample_head(1));
        assert_eq!(order.employee.country, "");
    }

    #[test]
    fn full_projection_folds_names_and_sorts_by_product() {
        let graph = OrderGraph {
            head: sample_head(10),
            details: vec![sample_joined(10, 9), sample_joined(10, 3)],
        };
        let order = full_order(graph);
        assert_eq!(order.details.len(), 2);
        assert_eq!(order.details[0].product.id, ProductId::new(3));
        assert_eq!(order.details[1].product.id, ProductId::new(9));
        assert_eq!(order.details[0].product.category, "Beverages");
        assert_eq!(order.details[0].product.supplier, "Exotic Liquids");
        assert_eq!(order.details[0].order_id, OrderId::new(10));
    }

    #[test]
    fn renormalization_extracts_keys_and_drops_display_text() {
        let graph = OrderGraph {
            head: sample_head(10),
            details: vec![sample_joined(10, 3)],
        };
        let mut order = full_order(graph);
        // Caller-supplied display text must not survive the write path.
        order.customer.company_name = "Imposter Inc.".to_string();
        order.details[0].product.product_name = "Imposter Tea".to_string();

        let (row, details) = order_rows(&order, OrderId::new(10));
        assert_eq!(row.customer_id, CustomerCode::new("ALFKI"));
        assert_eq!(row.employee_id, EmployeeId::new(1));
        assert_eq!(row.ship_via, ShipperId::new(2));
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].order_id, OrderId::new(10));
        assert_eq!(details[0].product_id, ProductId::new(3));
    }

    #[test]
    fn insert_target_rewrites_detail_owner() {
        let graph = OrderGraph {
            head: sample_head(10),
            details: vec![sample_joined(10, 3)],
        };
        let order = full_order(graph);
        let (row, details) = order_rows(&order, OrderId::new(0));
        assert!(row.order_id.is_transient());
        assert!(details[0].order_id.is_transient());
    }
}
