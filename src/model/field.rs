//! Canonical product fields.
//!
//! Every table, whatever its native column names, is normalized toward this
//! fixed vocabulary. The set never changes at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A canonical product attribute.
///
/// Declaration order is significant: projections emit fields in this order,
/// and `BTreeMap<CanonicalField, _>` iterates in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Id,
    Reference,
    Barcode,
    Description,
    Brand,
    SupplierCode,
    Name,
    Price,
    Stock,
    Location,
    Ean,
}

impl CanonicalField {
    /// All fields, in declaration order.
    pub const ALL: [CanonicalField; 11] = [
        CanonicalField::Id,
        CanonicalField::Reference,
        CanonicalField::Barcode,
        CanonicalField::Description,
        CanonicalField::Brand,
        CanonicalField::SupplierCode,
        CanonicalField::Name,
        CanonicalField::Price,
        CanonicalField::Stock,
        CanonicalField::Location,
        CanonicalField::Ean,
    ];

    /// The field id, also used as the projected column alias.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Id => "id",
            CanonicalField::Reference => "reference",
            CanonicalField::Barcode => "barcode",
            CanonicalField::Description => "description",
            CanonicalField::Brand => "brand",
            CanonicalField::SupplierCode => "supplier_code",
            CanonicalField::Name => "name",
            CanonicalField::Price => "price",
            CanonicalField::Stock => "stock",
            CanonicalField::Location => "location",
            CanonicalField::Ean => "ean",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a canonical field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown canonical field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for CanonicalField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        CanonicalField::ALL
            .into_iter()
            .find(|field| field.as_str() == lower)
            .ok_or(UnknownField(s.to_string()))
    }
}
