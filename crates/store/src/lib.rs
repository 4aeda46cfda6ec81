//! Persistence layer for the order schema.
//!
//! Table-shaped row model, the transactional store interface and its
//! backends, the row/aggregate mapper, and the order repository built on
//! top of all three.

pub mod mapper;
pub mod repository;
pub mod schema;
pub mod store;

pub use repository::OrderRepository;
pub use store::{
    ChangeBatch, CommitReceipt, InMemoryOrderStore, OrderStore, PgOrderStore, RowChange,
    StoreError,
};
