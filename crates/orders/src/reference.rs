//! Reference projections embedded in an order.
//!
//! Read-mostly, denormalized views of persisted reference data. On reads
//! the mapper fills every field from the joined rows. When an order is
//! constructed for a write, the caller may supply only the identifier and
//! leave display fields empty: the repository trusts the id and the store
//! re-derives display text from the referenced rows.

use serde::{Deserialize, Serialize};

use orderdesk_core::{CategoryId, CustomerCode, EmployeeId, ProductId, ShipperId, SupplierId};

/// Customer view: code plus company name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub code: CustomerCode,
    pub company_name: String,
}

impl Customer {
    /// Projection carrying only the identifier (write-side construction).
    pub fn from_code(code: CustomerCode) -> Self {
        Self {
            code,
            company_name: String::new(),
        }
    }
}

/// Employee view: id plus name and country.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
}

impl Employee {
    /// Projection carrying only the identifier (write-side construction).
    pub fn from_id(id: EmployeeId) -> Self {
        Self {
            id,
            first_name: String::new(),
            last_name: String::new(),
            country: String::new(),
        }
    }
}

/// Shipper view: id plus company name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shipper {
    pub id: ShipperId,
    pub company_name: String,
}

impl Shipper {
    /// Projection carrying only the identifier (write-side construction).
    pub fn from_id(id: ShipperId) -> Self {
        Self {
            id,
            company_name: String::new(),
        }
    }
}

/// Product view with category and supplier names folded in at query time.
///
/// The folded names are a computed view assembled by the mapper; they are
/// never written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    pub category_id: CategoryId,
    pub category: String,
    pub supplier_id: SupplierId,
    pub supplier: String,
}

impl Product {
    /// Projection carrying only the identifier (write-side construction).
    pub fn from_id(id: ProductId) -> Self {
        Self {
            id,
            product_name: String::new(),
            category_id: CategoryId::new(0),
            category: String::new(),
            supplier_id: SupplierId::new(0),
            supplier: String::new(),
        }
    }
}
