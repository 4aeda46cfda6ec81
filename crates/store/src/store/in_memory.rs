//! In-memory order store.
//!
//! Intended for tests/dev. Not optimized for performance: a commit clones
//! the tables, applies the batch to the clone and swaps it in, so a failed
//! change never touches the live data.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use orderdesk_core::{CustomerCode, OrderId};

use crate::schema::{
    CategoryRow, CustomerRow, DetailWithProduct, EmployeeRow, OrderDetailRow, OrderGraph,
    OrderHead, OrderRow, ProductRow, ShipperRow, SupplierRow,
};

use super::{ChangeBatch, CommitReceipt, OrderStore, RowChange, StoreError};

#[derive(Debug, Clone, Default)]
struct Tables {
    customers: BTreeMap<CustomerCode, CustomerRow>,
    employees: BTreeMap<i64, EmployeeRow>,
    shippers: BTreeMap<i64, ShipperRow>,
    categories: BTreeMap<i64, CategoryRow>,
    suppliers: BTreeMap<i64, SupplierRow>,
    products: BTreeMap<i64, ProductRow>,
    orders: BTreeMap<i64, OrderRow>,
    // Keyed by (order_id, product_id), the persisted composite key.
    order_details: BTreeMap<(i64, i64), OrderDetailRow>,
}

impl Tables {
    fn next_order_id(&self) -> i64 {
        self.orders.keys().next_back().copied().unwrap_or(0) + 1
    }

    fn check_order_refs(&self, row: &OrderRow) -> Result<(), StoreError> {
        if !self.customers.contains_key(&row.customer_id) {
            return Err(StoreError::ConstraintViolation(format!(
                "customer '{}' does not exist",
                row.customer_id
            )));
        }
        if !self.employees.contains_key(&row.employee_id.get()) {
            return Err(StoreError::ConstraintViolation(format!(
                "employee {} does not exist",
                row.employee_id
            )));
        }
        if !self.shippers.contains_key(&row.ship_via.get()) {
            return Err(StoreError::ConstraintViolation(format!(
                "shipper {} does not exist",
                row.ship_via
            )));
        }
        Ok(())
    }

    fn apply(&mut self, change: RowChange, receipt: &mut CommitReceipt) -> Result<(), StoreError> {
        match change {
            RowChange::InsertOrder(mut row) => {
                self.check_order_refs(&row)?;
                if row.order_id.is_transient() {
                    row.order_id = OrderId::new(self.next_order_id());
                }
                let id = row.order_id.get();
                if self.orders.contains_key(&id) {
                    return Err(StoreError::ConstraintViolation(format!(
                        "order {id} already exists"
                    )));
                }
                receipt.generated_order_id = Some(row.order_id);
                self.orders.insert(id, row);
            }
            RowChange::UpdateOrder(row) => {
                self.check_order_refs(&row)?;
                let id = row.order_id.get();
                if !self.orders.contains_key(&id) {
                    return Err(StoreError::StaleRow(format!("order {id}")));
                }
                self.orders.insert(id, row);
            }
            RowChange::DeleteOrder(id) => {
                if self
                    .order_details
                    .keys()
                    .any(|&(order, _)| order == id.get())
                {
                    return Err(StoreError::ConstraintViolation(format!(
                        "order {id} still has detail rows"
                    )));
                }
                if self.orders.remove(&id.get()).is_none() {
                    return Err(StoreError::StaleRow(format!("order {id}")));
                }
            }
            RowChange::InsertDetail(mut row) => {
                if row.order_id.is_transient() {
                    row.order_id = receipt.generated_order_id.ok_or_else(|| {
                        StoreError::ConstraintViolation(
                            "detail row references an order not inserted in this batch".to_string(),
                        )
                    })?;
                }
                let key = (row.order_id.get(), row.product_id.get());
                if !self.orders.contains_key(&key.0) {
                    return Err(StoreError::ConstraintViolation(format!(
                        "order {} does not exist",
                        key.0
                    )));
                }
                if !self.products.contains_key(&key.1) {
                    return Err(StoreError::ConstraintViolation(format!(
                        "product {} does not exist",
                        key.1
                    )));
                }
                if self.order_details.contains_key(&key) {
                    return Err(StoreError::ConstraintViolation(format!(
                        "detail row ({}, {}) already exists",
                        key.0, key.1
                    )));
                }
                self.order_details.insert(key, row);
            }
            RowChange::DeleteDetailsOf(id) => {
                self.order_details.retain(|&(order, _), _| order != id.get());
            }
        }
        Ok(())
    }

    fn head(&self, order: &OrderRow) -> Result<OrderHead, StoreError> {
        let customer = self.customers.get(&order.customer_id).cloned();
        let employee = self.employees.get(&order.employee_id.get()).cloned();
        let shipper = self.shippers.get(&order.ship_via.get()).cloned();
        match (customer, employee, shipper) {
            (Some(customer), Some(employee), Some(shipper)) => Ok(OrderHead {
                order: order.clone(),
                customer,
                employee,
                shipper,
            }),
            _ => Err(StoreError::ConstraintViolation(format!(
                "order {} has a dangling reference",
                order.order_id
            ))),
        }
    }

    fn joined_detail(&self, detail: &OrderDetailRow) -> Result<DetailWithProduct, StoreError> {
        let product = self
            .products
            .get(&detail.product_id.get())
            .cloned()
            .ok_or_else(|| {
                StoreError::ConstraintViolation(format!(
                    "detail row references missing product {}",
                    detail.product_id
                ))
            })?;
        let category = self
            .categories
            .get(&product.category_id.get())
            .cloned()
            .ok_or_else(|| {
                StoreError::ConstraintViolation(format!(
                    "product {} references missing category {}",
                    product.product_id, product.category_id
                ))
            })?;
        let supplier = self
            .suppliers
            .get(&product.supplier_id.get())
            .cloned()
            .ok_or_else(|| {
                StoreError::ConstraintViolation(format!(
                    "product {} references missing supplier {}",
                    product.product_id, product.supplier_id
                ))
            })?;
        Ok(DetailWithProduct {
            detail: detail.clone(),
            product,
            category,
            supplier,
        })
    }
}

/// In-memory implementation of [`OrderStore`].
///
/// Reference rows (customers, employees, shippers, categories, suppliers,
/// products) are never written by the order core; seed them through the
/// `put_*` methods before exercising order operations.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    tables: RwLock<Tables>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_customer(&self, row: CustomerRow) {
        if let Ok(mut tables) = self.tables.write() {
            tables.customers.insert(row.customer_id.clone(), row);
        }
    }

    pub fn put_employee(&self, row: EmployeeRow) {
        if let Ok(mut tables) = self.tables.write() {
            tables.employees.insert(row.employee_id.get(), row);
        }
    }

    pub fn put_shipper(&self, row: ShipperRow) {
        if let Ok(mut tables) = self.tables.write() {
            tables.shippers.insert(row.shipper_id.get(), row);
        }
    }

    pub fn put_category(&self, row: CategoryRow) {
        if let Ok(mut tables) = self.tables.write() {
            tables.categories.insert(row.category_id.get(), row);
        }
    }

    pub fn put_supplier(&self, row: SupplierRow) {
        if let Ok(mut tables) = self.tables.write() {
            tables.suppliers.insert(row.supplier_id.get(), row);
        }
    }

    pub fn put_product(&self, row: ProductRow) {
        if let Ok(mut tables) = self.tables.write() {
            tables.products.insert(row.product_id.get(), row);
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn fetch_order(&self, id: OrderId) -> Result<Option<OrderGraph>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Commit("lock poisoned".to_string()))?;

        let Some(order) = tables.orders.get(&id.get()) else {
            return Ok(None);
        };

        let head = tables.head(order)?;
        let details = tables
            .order_details
            .range((id.get(), i64::MIN)..=(id.get(), i64::MAX))
            .map(|(_, detail)| tables.joined_detail(detail))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(OrderGraph { head, details }))
    }

    async fn fetch_order_page(&self, skip: u64, count: u64) -> Result<Vec<OrderHead>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Commit("lock poisoned".to_string()))?;

        tables
            .orders
            .values()
            .skip(skip as usize)
            .take(count as usize)
            .map(|order| tables.head(order))
            .collect()
    }

    async fn order_exists(&self, id: OrderId) -> Result<bool, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Commit("lock poisoned".to_string()))?;
        Ok(tables.orders.contains_key(&id.get()))
    }

    async fn commit(&self, batch: ChangeBatch) -> Result<CommitReceipt, StoreError> {
        if batch.is_empty() {
            return Ok(CommitReceipt::default());
        }

        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Commit("lock poisoned".to_string()))?;

        // Stage against a copy so a failed change leaves the live tables
        // untouched, then swap the copy in.
        let mut staged = tables.clone();
        let mut receipt = CommitReceipt::default();
        for change in batch.into_changes() {
            staged.apply(change, &mut receipt)?;
        }
        *tables = staged;

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orderdesk_core::{CategoryId, EmployeeId, ProductId, ShipperId, SupplierId};

    fn seeded() -> InMemoryOrderStore {
        let store = InMemoryOrderStore::new();
        store.put_customer(CustomerRow {
            customer_id: CustomerCode::new("ALFKI"),
            company_name: "Alfreds Futterkiste".to_string(),
        });
        store.put_employee(EmployeeRow {
            employee_id: EmployeeId::new(1),
            last_name: "Davolio".to_string(),
            first_name: "Nancy".to_string(),
            country: Some("USA".to_string()),
        });
        store.put_shipper(ShipperRow {
            shipper_id: ShipperId::new(1),
            company_name: "Speedy Express".to_string(),
        });
        store.put_category(CategoryRow {
            category_id: CategoryId::new(1),
            category_name: "Beverages".to_string(),
        });
        store.put_supplier(SupplierRow {
            supplier_id: SupplierId::new(1),
            company_name: "Exotic Liquids".to_string(),
        });
        store.put_product(ProductRow {
            product_id: ProductId::new(7),
            product_name: "Chai".to_string(),
            supplier_id: SupplierId::new(1),
            category_id: CategoryId::new(1),
        });
        store
    }

    fn order_row() -> OrderRow {
        OrderRow {
            order_id: OrderId::new(0),
            customer_id: CustomerCode::new("ALFKI"),
            employee_id: EmployeeId::new(1),
            order_date: Utc::now(),
            required_date: Utc::now(),
            shipped_date: None,
            ship_via: ShipperId::new(1),
            freight: 32.38,
            ship_name: "Alfreds Futterkiste".to_string(),
            ship_address: "Obere Str. 57".to_string(),
            ship_city: "Berlin".to_string(),
            ship_region: None,
            ship_postal_code: "12209".to_string(),
            ship_country: "Germany".to_string(),
        }
    }

    fn detail_row(order_id: i64, product_id: i64) -> OrderDetailRow {
        OrderDetailRow {
            order_id: OrderId::new(order_id),
            product_id: ProductId::new(product_id),
            unit_price: 10.0,
            quantity: 3,
            discount: 0.1,
        }
    }

    #[tokio::test]
    async fn insert_assigns_identity_and_fixes_up_details() {
        let store = seeded();
        let mut batch = ChangeBatch::new();
        batch.push(RowChange::InsertOrder(order_row()));
        batch.push(RowChange::InsertDetail(detail_row(0, 7)));

        let receipt = store.commit(batch).await.unwrap();
        let id = receipt.generated_order_id.unwrap();
        assert_eq!(id, OrderId::new(1));

        let graph = store.fetch_order(id).await.unwrap().unwrap();
        assert_eq!(graph.details.len(), 1);
        assert_eq!(graph.details[0].detail.order_id, id);
        assert_eq!(graph.details[0].product.product_name, "Chai");
    }

    #[tokio::test]
    async fn generated_identities_are_monotonic() {
        let store = seeded();
        for expected in 1..=3 {
            let mut batch = ChangeBatch::new();
            batch.push(RowChange::InsertOrder(order_row()));
            let receipt = store.commit(batch).await.unwrap();
            assert_eq!(receipt.generated_order_id, Some(OrderId::new(expected)));
        }
    }

    #[tokio::test]
    async fn failed_batch_leaves_tables_unchanged() {
        let store = seeded();
        let mut batch = ChangeBatch::new();
        batch.push(RowChange::InsertOrder(order_row()));
        // Product 99 is not seeded; the whole batch must roll back.
        batch.push(RowChange::InsertDetail(detail_row(0, 99)));

        let err = store.commit(batch).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
        assert!(!store.order_exists(OrderId::new(1)).await.unwrap());
        assert!(store.fetch_order_page(0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_order_reference_is_a_constraint_violation() {
        let store = seeded();
        let mut row = order_row();
        row.customer_id = CustomerCode::new("NOONE");
        let mut batch = ChangeBatch::new();
        batch.push(RowChange::InsertOrder(row));

        let err = store.commit(batch).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn delete_requires_children_first() {
        let store = seeded();
        let mut batch = ChangeBatch::new();
        batch.push(RowChange::InsertOrder(order_row()));
        batch.push(RowChange::InsertDetail(detail_row(0, 7)));
        let id = store
            .commit(batch)
            .await
            .unwrap()
            .generated_order_id
            .unwrap();

        let mut wrong = ChangeBatch::new();
        wrong.push(RowChange::DeleteOrder(id));
        let err = store.commit(wrong).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));

        let mut right = ChangeBatch::new();
        right.push(RowChange::DeleteDetailsOf(id));
        right.push(RowChange::DeleteOrder(id));
        store.commit(right).await.unwrap();

        assert!(store.fetch_order(id).await.unwrap().is_none());
        // No orphaned detail rows survive the delete.
        let tables = store.tables.read().unwrap();
        assert!(tables.order_details.is_empty());
    }

    #[tokio::test]
    async fn composite_key_is_unique() {
        let store = seeded();
        let mut batch = ChangeBatch::new();
        batch.push(RowChange::InsertOrder(order_row()));
        batch.push(RowChange::InsertDetail(detail_row(0, 7)));
        batch.push(RowChange::InsertDetail(detail_row(0, 7)));

        let err = store.commit(batch).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn stale_update_is_reported() {
        let store = seeded();
        let mut row = order_row();
        row.order_id = OrderId::new(5);
        let mut batch = ChangeBatch::new();
        batch.push(RowChange::UpdateOrder(row));

        let err = store.commit(batch).await.unwrap_err();
        assert!(matches!(err, StoreError::StaleRow(_)));
    }
}
