//! Read-only enforcement.
//!
//! The gateway re-checks this, but nothing other than a SELECT ever leaves
//! the process.

use super::error::{QueryError, QueryResult};

/// Whether the trimmed, uppercased query starts with `SELECT`.
pub fn is_read_only(query: &str) -> bool {
    query.trim().to_uppercase().starts_with("SELECT")
}

/// Reject anything that is not a SELECT with [`QueryError::Validation`].
pub fn ensure_read_only(query: &str) -> QueryResult<()> {
    if is_read_only(query) {
        Ok(())
    } else {
        Err(QueryError::Validation(
            "Only SELECT queries are allowed: this explorer is read-only".to_string(),
        ))
    }
}
