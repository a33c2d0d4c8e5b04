//! Table configuration store.
//!
//! Holds the array of [`TableConfig`]s shared by discovery, search and the
//! mapping commands. All mutation goes through
//! [`ConfigStore::apply_config_update`], which runs the updater against the
//! latest snapshot under the channel's write lock, persists the full array
//! and then notifies subscribers.
//!
//! ```text
//! mutator ──► apply_config_update(updater)
//!                 │  latest snapshot (write-locked)
//!                 ├─► updater(&mut configs)
//!                 ├─► ConfigPersistence::save(all configs)
//!                 └─► watch broadcast ──► subscribe()
//! ```

mod storage;

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

pub use storage::{ConfigPersistence, MemoryConfigStorage, SqliteConfigStorage, TABLE_CONFIGS_KEY};

use crate::model::{CanonicalField, ColumnMapping, TableConfig};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to determine home directory")]
    NoHomeDir,

    #[error("Storage lock poisoned")]
    Poisoned,

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Configuration update did not run")]
    UpdateNotApplied,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Shared, persisted table configuration.
pub struct ConfigStore {
    tx: watch::Sender<Vec<TableConfig>>,
    persistence: Arc<dyn ConfigPersistence>,
}

impl ConfigStore {
    /// Load the persisted array and start serving it.
    pub fn open(persistence: Arc<dyn ConfigPersistence>) -> StoreResult<Self> {
        let initial = persistence.load()?;
        debug!(tables = initial.len(), "loaded table configuration");
        let (tx, _rx) = watch::channel(initial);
        Ok(Self { tx, persistence })
    }

    /// A store backed by volatile memory.
    pub fn in_memory() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            tx,
            persistence: Arc::new(MemoryConfigStorage::new()),
        }
    }

    /// Current configuration array.
    pub fn snapshot(&self) -> Vec<TableConfig> {
        self.tx.borrow().clone()
    }

    /// Configuration for one table.
    pub fn get(&self, table: &str) -> Option<TableConfig> {
        self.tx.borrow().iter().find(|c| c.name == table).cloned()
    }

    /// Names of enabled tables, in stored order.
    pub fn enabled_tables(&self) -> Vec<String> {
        self.tx
            .borrow()
            .iter()
            .filter(|c| c.enabled)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Receive every committed configuration array.
    pub fn subscribe(&self) -> watch::Receiver<Vec<TableConfig>> {
        self.tx.subscribe()
    }

    /// The single mutation entry point.
    ///
    /// `updater` edits a copy of the latest array. If the result differs
    /// from the current array it is persisted in full and broadcast; if
    /// persisting fails nothing changes. Returns the updater's value.
    pub fn apply_config_update<R>(
        &self,
        updater: impl FnOnce(&mut Vec<TableConfig>) -> R,
    ) -> StoreResult<R> {
        let mut outcome = None;
        self.tx.send_if_modified(|current| {
            let mut next = current.clone();
            let value = updater(&mut next);
            if next == *current {
                outcome = Some(Ok(value));
                return false;
            }
            match self.persistence.save(&next) {
                Ok(()) => {
                    *current = next;
                    outcome = Some(Ok(value));
                    true
                }
                Err(err) => {
                    outcome = Some(Err(err));
                    false
                }
            }
        });
        outcome.unwrap_or(Err(StoreError::UpdateNotApplied))
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Append default configs for tables not yet known. Returns the new names.
    pub fn register_tables(&self, tables: &[String]) -> StoreResult<Vec<String>> {
        let added = self.apply_config_update(|configs| {
            let mut added = Vec::new();
            for table in tables {
                if !configs.iter().any(|c| &c.name == table) {
                    configs.push(TableConfig::new(table.clone()));
                    added.push(table.clone());
                }
            }
            added
        })?;
        if !added.is_empty() {
            info!(tables = ?added, "registered newly discovered tables");
        }
        Ok(added)
    }

    pub fn set_enabled(&self, table: &str, enabled: bool) -> StoreResult<()> {
        self.update_table(table, |config| config.enabled = enabled)
    }

    /// Set or remove the explicit column for one field.
    pub fn set_field_mapping(
        &self,
        table: &str,
        field: CanonicalField,
        column: Option<String>,
    ) -> StoreResult<()> {
        self.update_table(table, |config| match column {
            Some(column) => {
                config.column_mapping.insert(field, column);
            }
            None => {
                config.column_mapping.remove(&field);
            }
        })
    }

    /// Additively merge `auto`: fields already mapped keep their column.
    /// Returns the fields added.
    pub fn merge_auto_mapping(
        &self,
        table: &str,
        auto: &ColumnMapping,
    ) -> StoreResult<Vec<CanonicalField>> {
        self.update_table(table, |config| {
            let mut added = Vec::new();
            for (field, column) in auto {
                if !config.column_mapping.contains_key(field) {
                    config.column_mapping.insert(*field, column.clone());
                    added.push(*field);
                }
            }
            added
        })
    }

    /// Reset the column mapping to empty.
    pub fn clear_mapping(&self, table: &str) -> StoreResult<()> {
        self.update_table(table, |config| config.column_mapping.clear())
    }

    pub fn set_search_fields(&self, table: &str, fields: BTreeSet<String>) -> StoreResult<()> {
        self.update_table(table, |config| config.search_fields = fields)
    }

    pub fn set_display_fields(&self, table: &str, fields: BTreeSet<String>) -> StoreResult<()> {
        self.update_table(table, |config| config.display_fields = fields)
    }

    fn update_table<R>(
        &self,
        table: &str,
        edit: impl FnOnce(&mut TableConfig) -> R,
    ) -> StoreResult<R> {
        self.apply_config_update(|configs| {
            configs
                .iter_mut()
                .find(|c| c.name == table)
                .map(edit)
                .ok_or_else(|| StoreError::UnknownTable(table.to_string()))
        })?
    }
}
