//! An in-process gateway serving canned catalog data.
//!
//! Answers the two introspection queries from its table list and returns
//! scripted rows for everything else, recording every request it sees.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::error::{QueryError, QueryResult};
use super::protocol::GatewayRequest;
use super::QueryGateway;
use crate::catalog::{LIST_COLUMNS_SQL, LIST_TABLES_SQL};
use crate::model::Row;

#[derive(Default)]
struct Script {
    tables: Vec<(String, Vec<String>)>,
    failing_tables: HashSet<String>,
    table_listing_error: Option<QueryError>,
    search_rows: Vec<Row>,
    search_error: Option<QueryError>,
    requests: Vec<GatewayRequest>,
}

/// Scripted [`QueryGateway`].
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<Script>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table and its columns in ordinal order.
    pub fn with_table(self, name: &str, columns: &[&str]) -> Self {
        self.lock().tables.push((
            name.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        ));
        self
    }

    /// Rows returned for any non-introspection query.
    pub fn with_search_rows(self, rows: Vec<Value>) -> Self {
        self.lock().search_rows = rows
            .into_iter()
            .filter_map(|row| row.as_object().cloned())
            .collect();
        self
    }

    /// Make column introspection fail for `table`.
    pub fn with_failing_columns(self, table: &str) -> Self {
        self.lock().failing_tables.insert(table.to_string());
        self
    }

    /// Make table discovery fail.
    pub fn with_table_listing_error(self, err: QueryError) -> Self {
        self.lock().table_listing_error = Some(err);
        self
    }

    /// Make every non-introspection query fail.
    pub fn with_search_error(self, err: QueryError) -> Self {
        self.lock().search_error = Some(err);
        self
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.lock().requests.clone()
    }

    /// Requests other than the two introspection queries.
    pub fn search_requests(&self) -> Vec<GatewayRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.query != LIST_TABLES_SQL && r.query != LIST_COLUMNS_SQL)
            .cloned()
            .collect()
    }

    /// Number of column introspection requests for `table`.
    pub fn column_requests_for(&self, table: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.query == LIST_COLUMNS_SQL && r.params.first() == Some(&json!(table)))
            .count()
    }

    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn single_column_rows(column: &str, values: impl IntoIterator<Item = String>) -> Vec<Row> {
    values
        .into_iter()
        .map(|value| {
            let mut row = Row::new();
            row.insert(column.to_string(), Value::String(value));
            row
        })
        .collect()
}

#[async_trait]
impl QueryGateway for ScriptedGateway {
    async fn execute(&self, request: GatewayRequest) -> QueryResult<Vec<Row>> {
        let mut script = self.lock();
        script.requests.push(request.clone());

        if request.query == LIST_TABLES_SQL {
            if let Some(err) = &script.table_listing_error {
                return Err(err.clone());
            }
            let mut names: Vec<String> = script.tables.iter().map(|(n, _)| n.clone()).collect();
            names.sort();
            return Ok(single_column_rows("table_name", names));
        }

        if request.query == LIST_COLUMNS_SQL {
            let table = request
                .params
                .first()
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if script.failing_tables.contains(&table) {
                return Err(QueryError::Database(format!(
                    "permission denied for table {}",
                    table
                )));
            }
            let found = script
                .tables
                .iter()
                .find(|(name, _)| *name == table)
                .map(|(_, columns)| columns.clone())
                .unwrap_or_default();
            return Ok(single_column_rows("column_name", found));
        }

        if let Some(err) = &script.search_error {
            return Err(err.clone());
        }
        Ok(script.search_rows.clone())
    }
}
