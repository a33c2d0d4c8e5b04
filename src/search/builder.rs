//! Federated query construction.
//!
//! Each participating table contributes one branch:
//!
//! ```text
//! SELECT
//!   "<col>" AS "id",            -- or NULL AS "id"
//!   ...                         -- every canonical field, declaration order
//!   '<table>' AS "source_table"
//! FROM "<table>"
//! WHERE "<c1>"::text ILIKE $1 OR "<c2>"::text ILIKE $1
//! ```
//!
//! Branches are joined with `UNION ALL` under one global `LIMIT`. The
//! [`FederatedQuery`] owns the match mode, so every branch binds the same
//! single parameter `$1` the same way.
//!
//! Projected columns are not cast: numbers reach the reconciler as numbers,
//! which the meaningful-value rule depends on. Postgres rejects the whole
//! union when two tables map the same field to incompatible types (an
//! integer `id` next to a varchar `id`); the search then fails with the
//! gateway's database error, and the fix is an override or disabling one
//! of the tables.

use std::collections::BTreeSet;

use crate::mapping::ColumnMapper;
use crate::model::{CanonicalField, ColumnMapping, TableConfig, SOURCE_TABLE_COLUMN};
use crate::sql::{
    any_of, col, lit_null, lit_str, param, Expr, ExprExt, Query, SelectExpr, TableRef, UnionAll,
};

use super::mode::SearchMode;

/// Columns searched in exact (barcode) mode.
pub const EAN_COLUMNS: &[&str] = &[
    "barcode",
    "eannr",
    "ean",
    "ean_code",
    "gtin",
    "upc",
    "article_code",
];

/// Columns searched in fuzzy mode when a table has no configured search fields.
pub const FUZZY_COLUMNS: &[&str] = &[
    "id",
    "reference",
    "ref",
    "sku",
    "article_code",
    "code_article",
    "product_code",
    "articlenr",
    "description",
    "desc",
    "desc_fr",
    "desc_nl",
    "desc_en",
    "designation",
    "libelle",
    "name",
    "product_name",
    "brand",
    "marque",
    "marque_nom",
    "manufacturer",
    "supplier",
    "supplier_code",
    "supplier_ref",
    "fournisseur",
    "code_fournisseur",
];

/// Default row limit for the unioned query.
pub const DEFAULT_ROW_LIMIT: u64 = 100;

/// Columns of a table searched in `mode`, in native order.
///
/// Exact mode always uses [`EAN_COLUMNS`]. Fuzzy mode uses `search_fields`
/// when non-empty, otherwise [`FUZZY_COLUMNS`].
pub fn searchable_columns<'a, S: AsRef<str>>(
    columns: &'a [S],
    mode: SearchMode,
    search_fields: &BTreeSet<String>,
) -> Vec<&'a str> {
    let allowed = |lower: &str| match mode {
        SearchMode::Exact => EAN_COLUMNS.contains(&lower),
        SearchMode::Fuzzy if !search_fields.is_empty() => search_fields
            .iter()
            .any(|f| f.eq_ignore_ascii_case(lower)),
        SearchMode::Fuzzy => FUZZY_COLUMNS.contains(&lower),
    };

    columns
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|c| allowed(c.to_lowercase().as_str()))
        .collect()
}

/// Projection of `table` onto every canonical field plus `source_table`.
pub fn build_projection<S: AsRef<str>>(
    mapper: &ColumnMapper,
    table: &str,
    columns: &[S],
    overrides: &ColumnMapping,
) -> Vec<SelectExpr> {
    project(table, &mapper.effective_mapping(columns, overrides))
}

/// Projection for an already resolved mapping.
pub fn project(table: &str, mapping: &ColumnMapping) -> Vec<SelectExpr> {
    let mut select: Vec<SelectExpr> = CanonicalField::ALL
        .iter()
        .map(|field| {
            let expr = match mapping.get(field) {
                Some(column) => col(column),
                None => lit_null(),
            };
            SelectExpr::new(expr).with_alias(field.as_str())
        })
        .collect();
    select.push(SelectExpr::new(lit_str(table)).with_alias(SOURCE_TABLE_COLUMN));
    select
}

/// `col::text = $1` (exact) or `col::text ILIKE $1` (fuzzy), OR'd.
///
/// No columns yields `1=0`.
pub fn build_search_predicate(searchable: &[&str], mode: SearchMode) -> Expr {
    let terms = searchable.iter().map(|column| {
        let lhs = col(column).cast_text();
        match mode {
            SearchMode::Exact => lhs.eq(param(1)),
            SearchMode::Fuzzy => lhs.ilike(param(1)),
        }
    });
    any_of(terms).unwrap_or_else(|| Expr::Raw("1=0".into()))
}

// =============================================================================
// Federated query
// =============================================================================

/// A UNION ALL over per-table branches bound to one parameter.
#[derive(Debug, Clone)]
pub struct FederatedQuery {
    mode: SearchMode,
    row_limit: u64,
    tables: Vec<String>,
    branches: Vec<Query>,
}

impl FederatedQuery {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            row_limit: DEFAULT_ROW_LIMIT,
            tables: Vec::new(),
            branches: Vec::new(),
        }
    }

    pub fn row_limit(mut self, limit: u64) -> Self {
        self.row_limit = limit;
        self
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Add a branch for `table`.
    ///
    /// Returns `false`, adding nothing, when the table has no searchable
    /// columns for this query's mode.
    pub fn add_table<S: AsRef<str>>(
        &mut self,
        mapper: &ColumnMapper,
        table: &str,
        columns: &[S],
        config: Option<&TableConfig>,
    ) -> bool {
        let empty = BTreeSet::new();
        let search_fields = config.map(|c| &c.search_fields).unwrap_or(&empty);
        let searchable = searchable_columns(columns, self.mode, search_fields);
        if searchable.is_empty() {
            return false;
        }

        let empty_overrides = ColumnMapping::new();
        let overrides = config.map(|c| &c.column_mapping).unwrap_or(&empty_overrides);

        let branch = Query::new()
            .select(build_projection(mapper, table, columns, overrides))
            .from(TableRef::new(table))
            .filter(build_search_predicate(&searchable, self.mode));
        self.branches.push(branch);
        self.tables.push(table.to_string());
        true
    }

    /// Tables with a branch, in insertion order.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Highest placeholder index across all branches.
    pub fn placeholder_count(&self) -> usize {
        self.branches
            .iter()
            .map(Query::max_placeholder)
            .max()
            .unwrap_or(0)
    }

    /// The bound parameter for `term`.
    pub fn parameter(&self, term: &str) -> String {
        self.mode.parameter(term)
    }

    pub fn to_sql(&self) -> String {
        UnionAll::new(self.branches.clone())
            .limit(self.row_limit)
            .to_sql()
    }
}
