//! Information-schema introspection queries and their result decoding.

use serde_json::Value;

use crate::gateway::{QueryError, QueryResult};
use crate::model::Row;

/// Candidate product tables in the public schema, by name.
pub const LIST_TABLES_SQL: &str = "SELECT table_name FROM information_schema.tables WHERE table_schema='public' AND (table_name LIKE 'raw_%' OR table_name='products') ORDER BY table_name";

/// Columns of table `$1` in ordinal order.
pub const LIST_COLUMNS_SQL: &str = "SELECT column_name FROM information_schema.columns WHERE table_schema='public' AND table_name=$1 ORDER BY ordinal_position";

pub(crate) const TABLE_NAME_COLUMN: &str = "table_name";
pub(crate) const COLUMN_NAME_COLUMN: &str = "column_name";

/// Extract one string column from every row, preserving order.
pub(crate) fn names_from_rows(rows: &[Row], column: &str) -> QueryResult<Vec<String>> {
    rows.iter()
        .map(|row| match row.get(column) {
            Some(Value::String(name)) => Ok(name.clone()),
            Some(other) => Err(QueryError::Decode(format!(
                "expected string in '{}', got {}",
                column, other
            ))),
            None => Err(QueryError::Decode(format!(
                "introspection row is missing '{}'",
                column
            ))),
        })
        .collect()
}
