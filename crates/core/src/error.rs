//! Repository error model.

use thiserror::Error;

use crate::id::OrderId;

/// Result type used across the repository layer.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failure kinds surfaced by order repository operations.
///
/// Kept deliberately small: the transport adapter translates each kind into
/// a user-visible response class, so every variant must stay meaningful to a
/// caller. Validation and persistence failures are distinct kinds and must
/// never collapse into one.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested order id has no matching row.
    #[error("order {0} was not found")]
    OrderNotFound(OrderId),

    /// Caller-supplied paging parameters were out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An order's line items violate a domain invariant. No write occurred.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The store could not complete an atomic write; wraps the cause.
    #[error("persistence failure: {0}")]
    Persistence(#[source] anyhow::Error),
}

impl RepositoryError {
    pub fn not_found(id: OrderId) -> Self {
        Self::OrderNotFound(id)
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn persistence(cause: impl Into<anyhow::Error>) -> Self {
        Self::Persistence(cause.into())
    }
}
