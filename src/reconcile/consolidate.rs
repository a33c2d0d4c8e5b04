//! Field-level resolution of a product group.

use std::collections::BTreeMap;

use serde::Serialize;

use super::identity::GroupKeyKind;
use crate::model::CanonicalField;

static MISSING: FieldResolution = FieldResolution::Missing;

/// How one field resolves across a group's members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FieldResolution {
    /// No member has a value.
    Missing,
    /// Every member with a value agrees.
    Single(String),
    /// Members disagree; all distinct values in member order.
    Conflicting(Vec<String>),
}

impl FieldResolution {
    pub fn from_values(mut values: Vec<String>) -> Self {
        match values.len() {
            0 => FieldResolution::Missing,
            1 => FieldResolution::Single(values.remove(0)),
            _ => FieldResolution::Conflicting(values),
        }
    }

    pub fn is_conflicting(&self) -> bool {
        matches!(self, FieldResolution::Conflicting(_))
    }
}

/// One product as seen across all its source tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedProduct {
    pub group_key: String,
    #[serde(rename = "groupKeyKind")]
    pub kind: GroupKeyKind,
    /// Index of the representative member in the group.
    pub primary_index: usize,
    pub member_count: usize,
    pub source_tables: Vec<String>,
    pub fields: BTreeMap<CanonicalField, FieldResolution>,
}

impl ConsolidatedProduct {
    pub fn resolution(&self, field: CanonicalField) -> &FieldResolution {
        self.fields.get(&field).unwrap_or(&MISSING)
    }

    pub fn conflicting_fields(&self) -> Vec<CanonicalField> {
        self.fields
            .iter()
            .filter(|(_, resolution)| resolution.is_conflicting())
            .map(|(field, _)| *field)
            .collect()
    }
}
