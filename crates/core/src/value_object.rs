//! Value objects: equality by value, no identity.

use serde::{Deserialize, Serialize};

/// Customer identifier: a short alphanumeric code assigned by the
/// back-office, not a numeric row id.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerCode(String);

impl CustomerCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CustomerCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<String> for CustomerCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Destination address snapshot carried on an order.
///
/// `region` is the only optional component; the schema requires the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        region: Option<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            region,
            postal_code: postal_code.into(),
            country: country.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_codes_compare_by_value() {
        assert_eq!(CustomerCode::new("ALFKI"), CustomerCode::new("ALFKI"));
        assert_ne!(CustomerCode::new("ALFKI"), CustomerCode::new("BONAP"));
    }

    #[test]
    fn addresses_compare_by_value() {
        let a = ShippingAddress::new("Obere Str. 57", "Berlin", None, "12209", "Germany");
        let b = ShippingAddress::new("Obere Str. 57", "Berlin", None, "12209", "Germany");
        assert_eq!(a, b);
    }
}
