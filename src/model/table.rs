//! Table descriptors and persisted per-table configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::field::CanonicalField;

/// Explicit or automatic column assignment per canonical field.
pub type ColumnMapping = BTreeMap<CanonicalField, String>;

/// A discovered table and its columns in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<String>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Resolve a column by case-insensitive name, returning the table's
    /// spelling.
    pub fn find_column(&self, name: &str) -> Option<&str> {
        find_column(&self.columns, name)
    }
}

/// Case-insensitive column lookup returning the native spelling.
pub fn find_column<'a, S: AsRef<str>>(columns: &'a [S], name: &str) -> Option<&'a str> {
    columns
        .iter()
        .map(AsRef::<str>::as_ref)
        .find(|column| column.eq_ignore_ascii_case(name))
}

/// User configuration for one table.
///
/// Created with defaults the first time discovery sees the table and never
/// deleted automatically. Serialized with camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    pub name: String,

    /// Whether the table takes part in federated search.
    #[serde(default)]
    pub enabled: bool,

    /// Columns searched in fuzzy mode. Empty means the built-in whitelist.
    #[serde(default)]
    pub search_fields: BTreeSet<String>,

    /// Columns shown for this table's rows.
    #[serde(default)]
    pub display_fields: BTreeSet<String>,

    /// Explicit overrides; they win over automatic matches.
    #[serde(default)]
    pub column_mapping: ColumnMapping,
}

impl TableConfig {
    /// Default configuration: disabled, no field sets, no overrides.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: false,
            search_fields: BTreeSet::new(),
            display_fields: BTreeSet::new(),
            column_mapping: ColumnMapping::new(),
        }
    }
}
