//! Core data model.
//!
//! - [`CanonicalField`] - the fixed target vocabulary
//! - [`NormalizedProductRow`] - fixed-shape search rows
//! - [`TableDescriptor`] / [`TableConfig`] - discovered tables and their settings

pub mod field;
pub mod row;
pub mod table;

pub use field::{CanonicalField, UnknownField};
pub use row::{FieldValue, NormalizedProductRow, Row, RowError, SOURCE_TABLE_COLUMN};
pub use table::{find_column, ColumnMapping, TableConfig, TableDescriptor};
