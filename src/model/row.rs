//! Normalized product rows.
//!
//! A [`NormalizedProductRow`] is the fixed-shape record every federated
//! search branch projects into: one nullable slot per [`CanonicalField`]
//! plus the table the row came from.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::field::CanonicalField;

/// A raw row object as returned by the query gateway.
pub type Row = Map<String, Value>;

/// Column alias carrying the originating table in every projected row.
pub const SOURCE_TABLE_COLUMN: &str = "source_table";

/// Errors decoding a gateway row into a normalized row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("row is missing the 'source_table' column")]
    MissingSourceTable,

    #[error("'source_table' must be a string, got {0}")]
    InvalidSourceTable(String),
}

// =============================================================================
// Field values
// =============================================================================

/// A non-null attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl FieldValue {
    /// Decode a JSON value. `null` yields `None`; nested values are kept as
    /// their JSON text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Number(n) => Some(FieldValue::Number(n.clone())),
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            other => Some(FieldValue::Text(other.to_string())),
        }
    }

    /// Whether the value carries information: non-blank text, a non-zero
    /// number or `true`.
    pub fn is_meaningful(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            FieldValue::Text(s) => !s.trim().is_empty(),
        }
    }

    /// Trimmed string form used for identity keys and conflict detection.
    /// Blank text yields `None`.
    pub fn display_value(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        match Number::from_f64(n) {
            Some(number) => FieldValue::Number(number),
            None => FieldValue::Text(n.to_string()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

// =============================================================================
// Normalized row
// =============================================================================

/// One projected search row, tagged with its source table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProductRow {
    pub id: Option<FieldValue>,
    pub reference: Option<FieldValue>,
    pub barcode: Option<FieldValue>,
    pub description: Option<FieldValue>,
    pub brand: Option<FieldValue>,
    pub supplier_code: Option<FieldValue>,
    pub name: Option<FieldValue>,
    pub price: Option<FieldValue>,
    pub stock: Option<FieldValue>,
    pub location: Option<FieldValue>,
    pub ean: Option<FieldValue>,
    pub source_table: String,
}

impl NormalizedProductRow {
    /// An empty row from `source_table`.
    pub fn new(source_table: impl Into<String>) -> Self {
        Self {
            source_table: source_table.into(),
            ..Default::default()
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, field: CanonicalField, value: impl Into<FieldValue>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    pub fn get(&self, field: CanonicalField) -> Option<&FieldValue> {
        self.slot(field).as_ref()
    }

    pub fn set(&mut self, field: CanonicalField, value: Option<FieldValue>) {
        *self.slot_mut(field) = value;
    }

    /// Trimmed, non-blank display value of `field`.
    pub fn text(&self, field: CanonicalField) -> Option<String> {
        self.get(field).and_then(FieldValue::display_value)
    }

    /// Number of fields holding a meaningful value.
    pub fn meaningful_count(&self) -> usize {
        CanonicalField::ALL
            .iter()
            .filter(|field| self.get(**field).is_some_and(FieldValue::is_meaningful))
            .count()
    }

    /// Decode a gateway row produced by a normalizing projection.
    ///
    /// Missing field columns decode as null; `source_table` is mandatory.
    pub fn from_json_row(row: &Row) -> Result<Self, RowError> {
        let source_table = match row.get(SOURCE_TABLE_COLUMN) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => return Err(RowError::MissingSourceTable),
            Some(other) => return Err(RowError::InvalidSourceTable(other.to_string())),
        };

        let mut normalized = NormalizedProductRow::new(source_table);
        for field in CanonicalField::ALL {
            let value = row.get(field.as_str()).and_then(FieldValue::from_json);
            normalized.set(field, value);
        }
        Ok(normalized)
    }

    fn slot(&self, field: CanonicalField) -> &Option<FieldValue> {
        match field {
            CanonicalField::Id => &self.id,
            CanonicalField::Reference => &self.reference,
            CanonicalField::Barcode => &self.barcode,
            CanonicalField::Description => &self.description,
            CanonicalField::Brand => &self.brand,
            CanonicalField::SupplierCode => &self.supplier_code,
            CanonicalField::Name => &self.name,
            CanonicalField::Price => &self.price,
            CanonicalField::Stock => &self.stock,
            CanonicalField::Location => &self.location,
            CanonicalField::Ean => &self.ean,
        }
    }

    fn slot_mut(&mut self, field: CanonicalField) -> &mut Option<FieldValue> {
        match field {
            CanonicalField::Id => &mut self.id,
            CanonicalField::Reference => &mut self.reference,
            CanonicalField::Barcode => &mut self.barcode,
            CanonicalField::Description => &mut self.description,
            CanonicalField::Brand => &mut self.brand,
            CanonicalField::SupplierCode => &mut self.supplier_code,
            CanonicalField::Name => &mut self.name,
            CanonicalField::Price => &mut self.price,
            CanonicalField::Stock => &mut self.stock,
            CanonicalField::Location => &mut self.location,
            CanonicalField::Ean => &mut self.ean,
        }
    }
}
