//! Grouping normalized rows by identity.

use std::collections::HashMap;

use serde::Serialize;

use super::consolidate::{ConsolidatedProduct, FieldResolution};
use super::identity::{GroupKeyKind, IdentityKey};
use crate::model::{CanonicalField, NormalizedProductRow};

/// Rows from one or more tables that describe the same product.
///
/// Members are never empty and share the identity value `group_key`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGroup {
    pub group_key: String,
    #[serde(rename = "groupKeyKind")]
    pub kind: GroupKeyKind,
    pub members: Vec<NormalizedProductRow>,
}

impl ProductGroup {
    /// Index of the representative member: most meaningful values, first on ties.
    pub fn primary_index(&self) -> usize {
        let mut best = 0;
        let mut best_count = 0;
        for (index, member) in self.members.iter().enumerate() {
            let count = member.meaningful_count();
            if index == 0 || count > best_count {
                best = index;
                best_count = count;
            }
        }
        best
    }

    pub fn primary(&self) -> &NormalizedProductRow {
        &self.members[self.primary_index()]
    }

    /// Distinct non-blank display values of `field`, in member order.
    pub fn values(&self, field: CanonicalField) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for value in self.members.iter().filter_map(|m| m.text(field)) {
            if !values.contains(&value) {
                values.push(value);
            }
        }
        values
    }

    pub fn is_conflicting(&self, field: CanonicalField) -> bool {
        self.values(field).len() > 1
    }

    /// Fields with more than one distinct value across members.
    pub fn conflicts(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .filter(|field| self.is_conflicting(*field))
            .collect()
    }

    /// Distinct member source tables, in member order.
    pub fn source_tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = Vec::new();
        for member in &self.members {
            if !tables.contains(&member.source_table) {
                tables.push(member.source_table.clone());
            }
        }
        tables
    }

    /// Resolve every field, surfacing conflicts instead of picking a value.
    pub fn consolidate(&self) -> ConsolidatedProduct {
        let fields = CanonicalField::ALL
            .into_iter()
            .map(|field| (field, FieldResolution::from_values(self.values(field))))
            .collect();

        ConsolidatedProduct {
            group_key: self.group_key.clone(),
            kind: self.kind,
            primary_index: self.primary_index(),
            member_count: self.members.len(),
            source_tables: self.source_tables(),
            fields,
        }
    }
}

/// Group rows that share an identity key.
///
/// Keys are derived table by table (tables in first-seen order), but groups
/// are global: the same barcode in two tables lands in one group. Members
/// keep their position in `rows`, so the primary-row tie-break follows the
/// original result order even when tables are interleaved. Groups are
/// ordered by descending size; equal sizes keep first-seen order.
pub fn group_by_identity(rows: &[NormalizedProductRow]) -> Vec<ProductGroup> {
    let mut tables: Vec<&str> = Vec::new();
    for row in rows {
        if !tables.contains(&row.source_table.as_str()) {
            tables.push(&row.source_table);
        }
    }

    let mut index: HashMap<IdentityKey, usize> = HashMap::new();
    let mut keys: Vec<IdentityKey> = Vec::new();
    let mut ordinals: Vec<Vec<usize>> = Vec::new();
    for table in tables {
        for (ordinal, row) in rows.iter().enumerate() {
            if row.source_table != table {
                continue;
            }
            let key = IdentityKey::of(row, ordinal);
            match index.get(&key) {
                Some(&position) => ordinals[position].push(ordinal),
                None => {
                    index.insert(key.clone(), keys.len());
                    keys.push(key);
                    ordinals.push(vec![ordinal]);
                }
            }
        }
    }

    let mut groups: Vec<ProductGroup> = keys
        .into_iter()
        .zip(ordinals)
        .map(|(key, mut members)| {
            members.sort_unstable();
            ProductGroup {
                group_key: key.render(),
                kind: key.kind(),
                members: members.into_iter().map(|i| rows[i].clone()).collect(),
            }
        })
        .collect();

    groups.sort_by(|a, b| b.members.len().cmp(&a.members.len()));
    groups
}
