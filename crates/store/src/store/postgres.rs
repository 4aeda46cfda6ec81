//! PostgreSQL order store.
//!
//! Runtime (non-macro) sqlx queries with manual row mapping and one
//! transaction per commit. The DDL for the schema lives in `schema.sql` at
//! the crate root and is applied out of band; the store runs no migrations.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};

use orderdesk_core::{CategoryId, CustomerCode, EmployeeId, OrderId, ProductId, ShipperId, SupplierId};

use crate::schema::{
    CategoryRow, CustomerRow, DetailWithProduct, EmployeeRow, OrderDetailRow, OrderGraph,
    OrderHead, OrderRow, ProductRow, ShipperRow, SupplierRow,
};

use super::{ChangeBatch, CommitReceipt, OrderStore, RowChange, StoreError};

const SELECT_ORDER_HEAD: &str = r#"
SELECT o.order_id, o.customer_id, o.employee_id, o.order_date, o.required_date,
       o.shipped_date, o.ship_via, o.freight, o.ship_name, o.ship_address,
       o.ship_city, o.ship_region, o.ship_postal_code, o.ship_country,
       c.company_name AS customer_company_name,
       e.last_name, e.first_name, e.country AS employee_country,
       s.company_name AS shipper_company_name
FROM orders o
JOIN customers c ON c.customer_id = o.customer_id
JOIN employees e ON e.employee_id = o.employee_id
JOIN shippers s ON s.shipper_id = o.ship_via
"#;

const SELECT_ORDER_DETAILS: &str = r#"
SELECT d.order_id, d.product_id, d.unit_price, d.quantity, d.discount,
       p.product_name, p.category_id, p.supplier_id,
       cat.category_name,
       sup.company_name AS supplier_company_name
FROM order_details d
JOIN products p ON p.product_id = d.product_id
JOIN categories cat ON cat.category_id = p.category_id
JOIN suppliers sup ON sup.supplier_id = p.supplier_id
WHERE d.order_id = $1
ORDER BY d.product_id
"#;

/// PostgreSQL implementation of [`OrderStore`] over a connection pool.
#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }
}

fn map_order_head(row: &PgRow) -> Result<OrderHead, sqlx::Error> {
    let order = OrderRow {
        order_id: OrderId::new(row.try_get::<i64, _>("order_id")?),
        customer_id: CustomerCode::new(row.try_get::<String, _>("customer_id")?),
        employee_id: EmployeeId::new(row.try_get::<i64, _>("employee_id")?),
        order_date: row.try_get("order_date")?,
        required_date: row.try_get("required_date")?,
        shipped_date: row.try_get("shipped_date")?,
        ship_via: ShipperId::new(row.try_get::<i64, _>("ship_via")?),
        freight: row.try_get::<f64, _>("freight")?,
        ship_name: row.try_get::<String, _>("ship_name")?,
        ship_address: row.try_get::<String, _>("ship_address")?,
        ship_city: row.try_get::<String, _>("ship_city")?,
        ship_region: row.try_get::<Option<String>, _>("ship_region")?,
        ship_postal_code: row.try_get::<String, _>("ship_postal_code")?,
        ship_country: row.try_get::<String, _>("ship_country")?,
    };
    let customer = CustomerRow {
        customer_id: order.customer_id.clone(),
        company_name: row.try_get::<String, _>("customer_company_name")?,
    };
    let employee = EmployeeRow {
        employee_id: order.employee_id,
        last_name: row.try_get::<String, _>("last_name")?,
        first_name: row.try_get::<String, _>("first_name")?,
        country: row.try_get::<Option<String>, _>("employee_country")?,
    };
    let shipper = ShipperRow {
        shipper_id: order.ship_via,
        company_name: row.try_get::<String, _>("shipper_company_name")?,
    };
    Ok(OrderHead {
        order,
        customer,
        employee,
        shipper,
    })
}

fn map_detail(row: &PgRow) -> Result<DetailWithProduct, sqlx::Error> {
    let detail = OrderDetailRow {
        order_id: OrderId::new(row.try_get::<i64, _>("order_id")?),
        product_id: ProductId::new(row.try_get::<i64, _>("product_id")?),
        unit_price: row.try_get::<f64, _>("unit_price")?,
        quantity: row.try_get::<i64, _>("quantity")?,
        discount: row.try_get::<f64, _>("discount")?,
    };
    let product = ProductRow {
        product_id: detail.product_id,
        product_name: row.try_get::<String, _>("product_name")?,
        supplier_id: SupplierId::new(row.try_get::<i64, _>("supplier_id")?),
        category_id: CategoryId::new(row.try_get::<i64, _>("category_id")?),
    };
    let category = CategoryRow {
        category_id: product.category_id,
        category_name: row.try_get::<String, _>("category_name")?,
    };
    let supplier = SupplierRow {
        supplier_id: product.supplier_id,
        company_name: row.try_get::<String, _>("supplier_company_name")?,
    };
    Ok(DetailWithProduct {
        detail,
        product,
        category,
        supplier,
    })
}

/// Map SQLSTATE class 23 (integrity constraint violation) onto the
/// store-level constraint error; everything else stays a driver error.
fn map_db_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = err {
        if let Some(code) = db.code() {
            if code.starts_with("23") {
                return StoreError::ConstraintViolation(db.message().to_string());
            }
        }
    }
    StoreError::Database(err)
}

async fn apply_change(
    tx: &mut Transaction<'_, Postgres>,
    change: RowChange,
    receipt: &mut CommitReceipt,
) -> Result<(), StoreError> {
    match change {
        RowChange::InsertOrder(row) => {
            let id = if row.order_id.is_transient() {
                let inserted = sqlx::query(
                    r#"
                    INSERT INTO orders (customer_id, employee_id, order_date, required_date,
                                        shipped_date, ship_via, freight, ship_name, ship_address,
                                        ship_city, ship_region, ship_postal_code, ship_country)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                    RETURNING order_id
                    "#,
                )
                .bind(row.customer_id.as_str())
                .bind(row.employee_id.get())
                .bind(row.order_date)
                .bind(row.required_date)
                .bind(row.shipped_date)
                .bind(row.ship_via.get())
                .bind(row.freight)
                .bind(&row.ship_name)
                .bind(&row.ship_address)
                .bind(&row.ship_city)
                .bind(&row.ship_region)
                .bind(&row.ship_postal_code)
                .bind(&row.ship_country)
                .fetch_one(&mut **tx)
                .await
                .map_err(map_db_err)?;
                OrderId::new(inserted.try_get::<i64, _>("order_id")?)
            } else {
                sqlx::query(
                    r#"
                    INSERT INTO orders (order_id, customer_id, employee_id, order_date,
                                        required_date, shipped_date, ship_via, freight, ship_name,
                                        ship_address, ship_city, ship_region, ship_postal_code,
                                        ship_country)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                    "#,
                )
                .bind(row.order_id.get())
                .bind(row.customer_id.as_str())
                .bind(row.employee_id.get())
                .bind(row.order_date)
                .bind(row.required_date)
                .bind(row.shipped_date)
                .bind(row.ship_via.get())
                .bind(row.freight)
                .bind(&row.ship_name)
                .bind(&row.ship_address)
                .bind(&row.ship_city)
                .bind(&row.ship_region)
                .bind(&row.ship_postal_code)
                .bind(&row.ship_country)
                .execute(&mut **tx)
                .await
                .map_err(map_db_err)?;
                row.order_id
            };
            receipt.generated_order_id = Some(id);
        }
        RowChange::UpdateOrder(row) => {
            let result = sqlx::query(
                r#"
                UPDATE orders
                SET customer_id = $2, employee_id = $3, order_date = $4, required_date = $5,
                    shipped_date = $6, ship_via = $7, freight = $8, ship_name = $9,
                    ship_address = $10, ship_city = $11, ship_region = $12,
                    ship_postal_code = $13, ship_country = $14
                WHERE order_id = $1
                "#,
            )
            .bind(row.order_id.get())
            .bind(row.customer_id.as_str())
            .bind(row.employee_id.get())
            .bind(row.order_date)
            .bind(row.required_date)
            .bind(row.shipped_date)
            .bind(row.ship_via.get())
            .bind(row.freight)
            .bind(&row.ship_name)
            .bind(&row.ship_address)
            .bind(&row.ship_city)
            .bind(&row.ship_region)
            .bind(&row.ship_postal_code)
            .bind(&row.ship_country)
            .execute(&mut **tx)
            .await
            .map_err(map_db_err)?;
            if result.rows_affected() == 0 {
                return Err(StoreError::StaleRow(format!("order {}", row.order_id)));
            }
        }
        RowChange::DeleteOrder(id) => {
            let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
                .bind(id.get())
                .execute(&mut **tx)
                .await
                .map_err(map_db_err)?;
            if result.rows_affected() == 0 {
                return Err(StoreError::StaleRow(format!("order {id}")));
            }
        }
        RowChange::InsertDetail(row) => {
            let order_id = if row.order_id.is_transient() {
                receipt.generated_order_id.ok_or_else(|| {
                    StoreError::ConstraintViolation(
                        "detail row references an order not inserted in this batch".to_string(),
                    )
                })?
            } else {
                row.order_id
            };
            sqlx::query(
                r#"
                INSERT INTO order_details (order_id, product_id, unit_price, quantity, discount)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order_id.get())
            .bind(row.product_id.get())
            .bind(row.unit_price)
            .bind(row.quantity)
            .bind(row.discount)
            .execute(&mut **tx)
            .await
            .map_err(map_db_err)?;
        }
        RowChange::DeleteDetailsOf(id) => {
            sqlx::query("DELETE FROM order_details WHERE order_id = $1")
                .bind(id.get())
                .execute(&mut **tx)
                .await
                .map_err(map_db_err)?;
        }
    }
    Ok(())
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn fetch_order(&self, id: OrderId) -> Result<Option<OrderGraph>, StoreError> {
        let head_query = format!("{SELECT_ORDER_HEAD} WHERE o.order_id = $1");
        let Some(head_row) = sqlx::query(&head_query)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };
        let head = map_order_head(&head_row)?;

        let detail_rows = sqlx::query(SELECT_ORDER_DETAILS)
            .bind(id.get())
            .fetch_all(&self.pool)
            .await?;
        let details = detail_rows
            .iter()
            .map(map_detail)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(OrderGraph { head, details }))
    }

    async fn fetch_order_page(&self, skip: u64, count: u64) -> Result<Vec<OrderHead>, StoreError> {
        let page_query = format!("{SELECT_ORDER_HEAD} ORDER BY o.order_id LIMIT $1 OFFSET $2");
        let rows = sqlx::query(&page_query)
            .bind(count as i64)
            .bind(skip as i64)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| map_order_head(row).map_err(StoreError::from))
            .collect()
    }

    async fn order_exists(&self, id: OrderId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM orders WHERE order_id = $1) AS present")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<bool, _>("present")?)
    }

    async fn commit(&self, batch: ChangeBatch) -> Result<CommitReceipt, StoreError> {
        if batch.is_empty() {
            return Ok(CommitReceipt::default());
        }

        let mut tx = self.pool.begin().await?;
        let mut receipt = CommitReceipt::default();
        for change in batch.into_changes() {
            apply_change(&mut tx, change, &mut receipt).await?;
        }
        tx.commit()
            .await
            .map_err(|err| StoreError::Commit(err.to_string()))?;
        Ok(receipt)
    }
}
