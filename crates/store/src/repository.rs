//! Order repository: the five-operation contract over an [`OrderStore`].

use tracing::debug;

use orderdesk_core::{OrderId, RepositoryError, RepositoryResult};
use orderdesk_orders::Order;

use crate::mapper;
use crate::store::{ChangeBatch, OrderStore, RowChange};

/// Orchestrates reads and writes for the order aggregate.
///
/// Every operation is a single suspending unit of work. Each mutation maps
/// to exactly one store commit, so a failure inside the store leaves no
/// partial effect. Failures are never caught and suppressed here; every
/// kind propagates to the caller, and nothing is retried. Concurrent
/// updates to the same order are last-writer-wins by design.
#[derive(Debug, Clone)]
pub struct OrderRepository<S> {
    store: S,
}

impl<S: OrderStore> OrderRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetch one order in full projection (references plus all line items
    /// with product, category and supplier names).
    pub async fn get_order(&self, id: OrderId) -> RepositoryResult<Order> {
        let graph = self
            .store
            .fetch_order(id)
            .await
            .map_err(|err| RepositoryError::persistence(err))?;

        match graph {
            Some(graph) => Ok(mapper::full_order(graph)),
            None => Err(RepositoryError::not_found(id)),
        }
    }

    /// List a window of orders in brief projection, ordered by order id
    /// ascending. The window is `[skip, skip + count)`, which keeps
    /// pagination stable across calls as long as rows are not concurrently
    /// deleted.
    pub async fn list_orders(&self, skip: i64, count: i64) -> RepositoryResult<Vec<Order>> {
        if skip < 0 {
            return Err(RepositoryError::invalid_argument("skip must not be negative"));
        }
        if count <= 0 {
            return Err(RepositoryError::invalid_argument("count must be positive"));
        }

        let heads = self
            .store
            .fetch_order_page(skip as u64, count as u64)
            .await
            .map_err(|err| RepositoryError::persistence(err))?;

        Ok(heads.into_iter().map(mapper::brief_order).collect())
    }

    /// Validate and durably add a transient order with all of its line
    /// items as one atomic unit. Returns the store-generated identity.
    pub async fn add_order(&self, order: &Order) -> RepositoryResult<OrderId> {
        order.validate_details()?;

        let (row, details) = mapper::order_rows(order, OrderId::new(0));
        let mut batch = ChangeBatch::new();
        batch.push(RowChange::InsertOrder(row));
        for detail in details {
            batch.push(RowChange::InsertDetail(detail));
        }

        let receipt = self
            .store
            .commit(batch)
            .await
            .map_err(|err| RepositoryError::persistence(err))?;

        let id = receipt.generated_order_id.ok_or_else(|| {
            RepositoryError::persistence(anyhow::anyhow!("store reported no generated order id"))
        })?;

        debug!(order_id = id.get(), lines = order.details.len(), "order added");
        Ok(id)
    }

    /// Delete an order and all of its line items as one atomic unit.
    pub async fn remove_order(&self, id: OrderId) -> RepositoryResult<()> {
        if !self
            .store
            .order_exists(id)
            .await
            .map_err(|err| RepositoryError::persistence(err))?
        {
            return Err(RepositoryError::not_found(id));
        }

        let mut batch = ChangeBatch::new();
        // Children first, so the referential constraints hold at every
        // point inside the batch.
        batch.push(RowChange::DeleteDetailsOf(id));
        batch.push(RowChange::DeleteOrder(id));

        self.store
            .commit(batch)
            .await
            .map_err(|err| RepositoryError::persistence(err))?;

        debug!(order_id = id.get(), "order removed");
        Ok(())
    }

    /// Overwrite an existing order: scalar fields and the entire line-item
    /// set, as one atomic unit.
    ///
    /// This is a full replace, not a diff: every existing line item is
    /// deleted and the incoming set is inserted fresh, so lines omitted by
    /// the caller are lost.
    pub async fn update_order(&self, order: &Order) -> RepositoryResult<()> {
        if !self
            .store
            .order_exists(order.id)
            .await
            .map_err(|err| RepositoryError::persistence(err))?
        {
            return Err(RepositoryError::not_found(order.id));
        }

        order.validate_details()?;

        let (row, details) = mapper::order_rows(order, order.id);
        let mut batch = ChangeBatch::new();
        batch.push(RowChange::UpdateOrder(row));
        batch.push(RowChange::DeleteDetailsOf(order.id));
        for detail in details {
            batch.push(RowChange::InsertDetail(detail));
        }

        self.store
            .commit(batch)
            .await
            .map_err(|err| RepositoryError::persistence(err))?;

        debug!(
            order_id = order.id.get(),
            lines = order.details.len(),
            "order replaced"
        );
        Ok(())
    }
}
