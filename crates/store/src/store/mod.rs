//! Transactional store interface for the order schema.
//!
//! Reads are eager-joined projections; writes are staged as a
//! [`ChangeBatch`] and applied by [`OrderStore::commit`] as one atomic
//! unit. Concurrency control beyond per-commit atomicity is the backing
//! engine's job, not this interface's.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryOrderStore;
pub use postgres::PgOrderStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use orderdesk_core::OrderId;

use crate::schema::{OrderDetailRow, OrderGraph, OrderHead, OrderRow};

/// Store operation error.
///
/// Infrastructure failures only; domain validation lives above the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A row change violated a schema constraint (foreign key, composite
    /// key, children-first delete order).
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// A staged update or delete targeted a row that no longer exists.
    #[error("stale row: {0}")]
    StaleRow(String),

    /// The database driver reported a failure.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// The commit itself could not complete.
    #[error("commit failed: {0}")]
    Commit(String),
}

/// A single staged row change.
#[derive(Debug, Clone, PartialEq)]
pub enum RowChange {
    /// Insert an order row. Id 0 asks the store to assign an identity.
    InsertOrder(OrderRow),
    /// Overwrite the scalar columns of an existing order row.
    UpdateOrder(OrderRow),
    /// Delete an order row. Its detail rows must already be gone.
    DeleteOrder(OrderId),
    /// Insert a detail row. Order id 0 attaches the row to the order
    /// inserted earlier in the same batch.
    InsertDetail(OrderDetailRow),
    /// Delete every detail row belonging to an order.
    DeleteDetailsOf(OrderId),
}

/// An ordered set of row changes that commit or fail together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeBatch {
    changes: Vec<RowChange>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: RowChange) {
        self.changes.push(change);
    }

    pub fn into_changes(self) -> Vec<RowChange> {
        self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// What a commit produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Identity assigned to the order inserted by this batch, if any.
    pub generated_order_id: Option<OrderId>,
}

/// Row-level access to the order schema.
///
/// Implementations must apply each committed batch all-or-nothing: a
/// failure anywhere inside the batch leaves no partial effect.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Fetch one order with customer/employee/shipper joined, plus every
    /// detail row joined with its product, category and supplier.
    async fn fetch_order(&self, id: OrderId) -> Result<Option<OrderGraph>, StoreError>;

    /// Fetch a window of orders with top-level references joined, ordered
    /// by order id ascending.
    async fn fetch_order_page(&self, skip: u64, count: u64) -> Result<Vec<OrderHead>, StoreError>;

    /// Whether an order row exists.
    async fn order_exists(&self, id: OrderId) -> Result<bool, StoreError>;

    /// Apply a staged batch as one all-or-nothing commit.
    async fn commit(&self, batch: ChangeBatch) -> Result<CommitReceipt, StoreError>;
}

#[async_trait]
impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    async fn fetch_order(&self, id: OrderId) -> Result<Option<OrderGraph>, StoreError> {
        (**self).fetch_order(id).await
    }

    async fn fetch_order_page(&self, skip: u64, count: u64) -> Result<Vec<OrderHead>, StoreError> {
        (**self).fetch_order_page(skip, count).await
    }

    async fn order_exists(&self, id: OrderId) -> Result<bool, StoreError> {
        (**self).order_exists(id).await
    }

    async fn commit(&self, batch: ChangeBatch) -> Result<CommitReceipt, StoreError> {
        (**self).commit(batch).await
    }
}
