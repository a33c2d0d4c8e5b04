//! Identity keys: which rows describe the same physical product.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{CanonicalField, NormalizedProductRow};

/// Which attribute a group was keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKeyKind {
    /// Barcode, or EAN when the barcode is empty.
    Barcode,
    SupplierCode,
    /// Per-table fallback on `id`.
    Reference,
}

impl GroupKeyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKeyKind::Barcode => "barcode",
            GroupKeyKind::SupplierCode => "supplier_code",
            GroupKeyKind::Reference => "reference",
        }
    }
}

impl fmt::Display for GroupKeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping key of one row.
///
/// Barcode and EAN share a variant so a barcode in one table meets the same
/// code stored as EAN in another. The fallback variants are scoped to the
/// source table; `Ordinal` is unique per row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum IdentityKey {
    Barcode(String),
    SupplierCode(String),
    Id { id: String, table: String },
    Ordinal { ordinal: usize, table: String },
}

impl IdentityKey {
    /// Derive the key: barcode, else EAN, else supplier code, else
    /// `id` within the source table, else the row's position.
    pub(crate) fn of(row: &NormalizedProductRow, ordinal: usize) -> Self {
        if let Some(code) = row
            .text(CanonicalField::Barcode)
            .or_else(|| row.text(CanonicalField::Ean))
        {
            return IdentityKey::Barcode(code);
        }
        if let Some(code) = row.text(CanonicalField::SupplierCode) {
            return IdentityKey::SupplierCode(code);
        }
        match row.text(CanonicalField::Id) {
            Some(id) => IdentityKey::Id {
                id,
                table: row.source_table.clone(),
            },
            None => IdentityKey::Ordinal {
                ordinal,
                table: row.source_table.clone(),
            },
        }
    }

    pub(crate) fn kind(&self) -> GroupKeyKind {
        match self {
            IdentityKey::Barcode(_) => GroupKeyKind::Barcode,
            IdentityKey::SupplierCode(_) => GroupKeyKind::SupplierCode,
            IdentityKey::Id { .. } | IdentityKey::Ordinal { .. } => GroupKeyKind::Reference,
        }
    }

    /// Display form used as the group key.
    ///
    /// Barcode and supplier keys render as the bare code, so a group is
    /// identified by its kind together with this string.
    pub(crate) fn render(&self) -> String {
        match self {
            IdentityKey::Barcode(code) | IdentityKey::SupplierCode(code) => code.clone(),
            IdentityKey::Id { id, table } => format!("{}@{}", id, table),
            IdentityKey::Ordinal { ordinal, table } => format!("#{}@{}", ordinal, table),
        }
    }
}
