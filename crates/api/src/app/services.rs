//! Store selection and repository wiring.

use std::sync::Arc;

use orderdesk_store::{InMemoryOrderStore, OrderRepository, OrderStore, PgOrderStore, StoreError};

/// Shared per-process services handed to every handler.
pub struct AppServices {
    pub orders: OrderRepository<Arc<dyn OrderStore>>,
}

impl AppServices {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self {
            orders: OrderRepository::new(store),
        }
    }
}

/// Wire services from the environment.
///
/// `DATABASE_URL` selects the PostgreSQL store; without it an empty
/// in-memory store is used (dev only; reference data must be seeded by
/// hand before orders can be written).
pub async fn build_services() -> Result<AppServices, StoreError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = PgOrderStore::connect(&url).await?;
            tracing::info!("using postgresql order store");
            Ok(AppServices::new(Arc::new(store)))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using empty in-memory order store");
            Ok(AppServices::new(Arc::new(InMemoryOrderStore::new())))
        }
    }
}
