//! Column mapper.
//!
//! Maps a table's native column names onto [`CanonicalField`]s. For each
//! field the first qualifying column in native order wins; overrides stored
//! in [`TableConfig::column_mapping`](crate::model::TableConfig) take
//! precedence over automatic matches.

use serde::Serialize;
use tracing::warn;

use super::rules::{FieldRule, DEFAULT_FIELD_RULES};
use crate::model::{find_column, CanonicalField, ColumnMapping};

/// A field that more than one column could satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingDiagnostic {
    pub field: CanonicalField,
    /// The column automatic mapping picks (first in native order).
    pub chosen: String,
    /// Every qualifying column, in native order, `chosen` included.
    pub candidates: Vec<String>,
}

/// Evaluates a rule table against column lists.
#[derive(Debug, Clone)]
pub struct ColumnMapper {
    rules: Vec<FieldRule>,
}

impl Default for ColumnMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnMapper {
    /// Mapper using the built-in rule table.
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_FIELD_RULES.clone(),
        }
    }

    /// Mapper using a custom rule table.
    pub fn with_rules(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Every column qualifying for `field`, in native order.
    pub fn candidates<'a, S: AsRef<str>>(
        &self,
        field: CanonicalField,
        columns: &'a [S],
    ) -> Vec<&'a str> {
        self.rules
            .iter()
            .filter(|rule| rule.field == field)
            .flat_map(|rule| {
                columns
                    .iter()
                    .map(AsRef::<str>::as_ref)
                    .filter(move |column| rule.matches(column))
            })
            .collect()
    }

    /// Automatic mapping: first qualifying column per field.
    ///
    /// Fields with no qualifying column are absent from the result.
    pub fn auto_map<S: AsRef<str>>(&self, columns: &[S]) -> ColumnMapping {
        let mut mapping = ColumnMapping::new();
        for rule in &self.rules {
            if mapping.contains_key(&rule.field) {
                continue;
            }
            let found = columns
                .iter()
                .map(AsRef::<str>::as_ref)
                .find(|c| rule.matches(c));
            if let Some(column) = found {
                mapping.insert(rule.field, column.to_string());
            }
        }
        mapping
    }

    /// The mapping actually used for projection.
    ///
    /// Overrides win; an override naming a column the table lacks is ignored
    /// and the automatic match, if any, is used instead.
    pub fn effective_mapping<S: AsRef<str>>(
        &self,
        columns: &[S],
        overrides: &ColumnMapping,
    ) -> ColumnMapping {
        let mut mapping = self.auto_map(columns);
        for (field, column) in overrides {
            match find_column(columns, column) {
                Some(native) => {
                    mapping.insert(*field, native.to_string());
                }
                None => {
                    warn!(
                        field = %field,
                        column = %column,
                        "ignoring mapping override: column not present in table"
                    );
                }
            }
        }
        mapping
    }

    /// Add automatic matches for fields not yet in `existing`.
    ///
    /// Never overwrites an explicit mapping. Returns the fields added.
    pub fn merge_auto_map<S: AsRef<str>>(
        &self,
        existing: &mut ColumnMapping,
        columns: &[S],
    ) -> Vec<CanonicalField> {
        let mut added = Vec::new();
        for (field, column) in self.auto_map(columns) {
            if !existing.contains_key(&field) {
                existing.insert(field, column);
                added.push(field);
            }
        }
        added
    }

    /// Fields with more than one qualifying column.
    pub fn diagnose<S: AsRef<str>>(&self, columns: &[S]) -> Vec<MappingDiagnostic> {
        CanonicalField::ALL
            .iter()
            .filter_map(|field| {
                let candidates = self.candidates(*field, columns);
                if candidates.len() < 2 {
                    return None;
                }
                Some(MappingDiagnostic {
                    field: *field,
                    chosen: candidates[0].to_string(),
                    candidates: candidates.iter().map(|c| c.to_string()).collect(),
                })
            })
            .collect()
    }
}
