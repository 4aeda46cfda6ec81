//! Sales order domain model.
//!
//! This crate contains the order aggregate and the reference projections it
//! carries, implemented as pure data shapes (no IO, no storage concerns).

pub mod order;
pub mod reference;

pub use order::{Order, OrderDetail};
pub use reference::{Customer, Employee, Product, Shipper};
