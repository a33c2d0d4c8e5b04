//! Table discovery and cached column introspection.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::json;
use tracing::{debug, warn};

use super::introspection::{
    names_from_rows, COLUMN_NAME_COLUMN, LIST_COLUMNS_SQL, LIST_TABLES_SQL, TABLE_NAME_COLUMN,
};
use crate::gateway::{QueryExecutor, QueryResult};
use crate::model::TableDescriptor;
use crate::store::ConfigStore;

/// Discovers candidate tables and their columns through the query gateway.
///
/// Column lists are cached per table name for the lifetime of the resolver;
/// entries only go away through [`invalidate`](Self::invalidate). The cache
/// is a `DashMap`, so one resolver can be shared across tasks.
///
/// Discovery doubles as registration: every discovered table the
/// [`ConfigStore`] does not know yet is appended with a default config.
pub struct CatalogResolver {
    executor: Arc<QueryExecutor>,
    store: Arc<ConfigStore>,
    columns: DashMap<String, Vec<String>>,
}

impl CatalogResolver {
    pub fn new(executor: Arc<QueryExecutor>, store: Arc<ConfigStore>) -> Self {
        Self {
            executor,
            store,
            columns: DashMap::new(),
        }
    }

    /// Tables named `raw_%` or `products`, ordered by name.
    pub async fn list_candidate_tables(&self) -> QueryResult<Vec<String>> {
        let rows = self.executor.execute(LIST_TABLES_SQL, Vec::new()).await?;
        let tables = names_from_rows(&rows, TABLE_NAME_COLUMN)?;
        debug!(count = tables.len(), "discovered candidate tables");

        // Registration failure leaves discovery usable.
        if let Err(err) = self.store.register_tables(&tables) {
            warn!(error = %err, "failed to register discovered tables");
        }
        Ok(tables)
    }

    /// Columns of `table` in ordinal order, from cache when present.
    pub async fn list_columns(&self, table: &str) -> QueryResult<Vec<String>> {
        if let Some(cached) = self.cached_columns(table) {
            return Ok(cached);
        }

        let rows = self
            .executor
            .execute(LIST_COLUMNS_SQL, vec![json!(table)])
            .await?;
        let columns = names_from_rows(&rows, COLUMN_NAME_COLUMN)?;
        debug!(table, count = columns.len(), "fetched columns");

        self.columns.insert(table.to_string(), columns.clone());
        Ok(columns)
    }

    /// Name and columns of `table`.
    pub async fn describe(&self, table: &str) -> QueryResult<TableDescriptor> {
        let columns = self.list_columns(table).await?;
        Ok(TableDescriptor::new(table, columns))
    }

    /// Peek the cache without I/O.
    pub fn cached_columns(&self, table: &str) -> Option<Vec<String>> {
        self.columns.get(table).map(|entry| entry.value().clone())
    }

    pub fn invalidate(&self, table: &str) {
        self.columns.remove(table);
    }

    pub fn invalidate_all(&self) {
        self.columns.clear();
    }
}
