//! Durable storage for the table configuration array.
//!
//! The whole array is stored as one JSON value under a fixed key and
//! rewritten in full on every mutation.
//!
//! # Design
//!
//! - SQLite key-value table with JSON values
//! - Stored at `~/.prodscope/config.db` unless configured otherwise

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::{StoreError, StoreResult};
use crate::model::TableConfig;

/// Fixed storage key for the serialized configuration array.
pub const TABLE_CONFIGS_KEY: &str = "prodscope.tableConfigs";

/// Loads and saves the full configuration array.
pub trait ConfigPersistence: Send + Sync {
    fn load(&self) -> StoreResult<Vec<TableConfig>>;
    fn save(&self, configs: &[TableConfig]) -> StoreResult<()>;
}

// =============================================================================
// SQLite
// =============================================================================

/// SQLite-backed [`ConfigPersistence`].
pub struct SqliteConfigStorage {
    conn: Mutex<Connection>,
}

impl SqliteConfigStorage {
    /// Open or create the storage database at the default location.
    pub fn open() -> StoreResult<Self> {
        Self::open_at(Self::default_path()?)
    }

    /// Open or create the storage database at `path`.
    pub fn open_at<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let storage = Self {
            conn: Mutex::new(Connection::open(path)?),
        };
        storage.init()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let storage = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        storage.init()?;
        Ok(storage)
    }

    /// `~/.prodscope/config.db`
    pub fn default_path() -> StoreResult<PathBuf> {
        let base = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        Ok(base.join(".prodscope").join("config.db"))
    }

    fn init(&self) -> StoreResult<()> {
        self.conn()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl ConfigPersistence for SqliteConfigStorage {
    fn load(&self) -> StoreResult<Vec<TableConfig>> {
        let json: Option<String> = self
            .conn()?
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![TABLE_CONFIGS_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(s) => Ok(serde_json::from_str(&s)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, configs: &[TableConfig]) -> StoreResult<()> {
        let json = serde_json::to_string(configs)?;
        self.conn()?.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
            params![TABLE_CONFIGS_KEY, json],
        )?;
        Ok(())
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Volatile [`ConfigPersistence`] that counts full rewrites.
#[derive(Default)]
pub struct MemoryConfigStorage {
    state: Mutex<(Vec<TableConfig>, usize)>,
}

impl MemoryConfigStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `configs`.
    pub fn with_configs(configs: Vec<TableConfig>) -> Self {
        Self {
            state: Mutex::new((configs, 0)),
        }
    }

    /// Number of times the array was written.
    pub fn save_count(&self) -> usize {
        self.lock().1
    }

    /// The last saved array.
    pub fn saved(&self) -> Vec<TableConfig> {
        self.lock().0.clone()
    }

    fn lock(&self) -> MutexGuard<'_, (Vec<TableConfig>, usize)> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConfigPersistence for MemoryConfigStorage {
    fn load(&self) -> StoreResult<Vec<TableConfig>> {
        Ok(self.lock().0.clone())
    }

    fn save(&self, configs: &[TableConfig]) -> StoreResult<()> {
        let mut state = self.lock();
        state.0 = configs.to_vec();
        state.1 += 1;
        Ok(())
    }
}
