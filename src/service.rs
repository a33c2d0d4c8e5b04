//! High-level explorer API.
//!
//! [`ProductExplorer`] wires the gateway, catalog, store and search together
//! and is the boundary where typed errors become [`QueryOutcome`]s:
//!
//! ```text
//! ProductExplorer
//!   ├── QueryExecutor ──► dyn QueryGateway
//!   ├── CatalogResolver (column cache, table registration)
//!   ├── ConfigStore (persisted TableConfig array)
//!   └── FederatedSearch ──► group_by_identity
//! ```
//!
//! # Example
//!
//! ```ignore
//! use prodscope::config::Settings;
//! use prodscope::service::ProductExplorer;
//!
//! let settings = Settings::load()?;
//! let explorer = ProductExplorer::from_settings(&settings)?;
//!
//! let outcome = explorer.search_grouped("drill").await;
//! if let Some(grouped) = outcome.data {
//!     for group in &grouped.groups {
//!         println!("{} ({} sources)", group.group_key, group.members.len());
//!     }
//! }
//! ```

use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::catalog::CatalogResolver;
use crate::config::{ConnectionConfig, SearchSettings, Settings, SettingsError};
use crate::gateway::{HttpGateway, QueryError, QueryExecutor, QueryGateway};
use crate::mapping::{ColumnMapper, MappingDiagnostic};
use crate::model::{CanonicalField, ColumnMapping, Row};
use crate::reconcile::{group_by_identity, ProductGroup};
use crate::search::{FederatedSearch, SearchResult};
use crate::store::{ConfigStore, SqliteConfigStorage, StoreError};

// ============================================================================
// Error Types
// ============================================================================

/// Errors from explorer operations that are not reported as outcomes.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Data or an error message, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> QueryOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl<T, E: Display> From<Result<T, E>> for QueryOutcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => QueryOutcome::ok(data),
            Err(err) => QueryOutcome::err(err.to_string()),
        }
    }
}

/// A search result with its rows grouped by product identity.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedSearch {
    pub result: SearchResult,
    pub groups: Vec<ProductGroup>,
}

/// Mapping state of one table as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct TableMappingView {
    pub table: String,
    pub columns: Vec<String>,
    /// Explicit overrides stored in the table's config.
    pub overrides: ColumnMapping,
    /// What projection actually uses.
    pub effective: ColumnMapping,
    pub diagnostics: Vec<MappingDiagnostic>,
}

// ============================================================================
// Explorer
// ============================================================================

pub struct ProductExplorer {
    executor: Arc<QueryExecutor>,
    store: Arc<ConfigStore>,
    catalog: Arc<CatalogResolver>,
    search: FederatedSearch,
    mapper: ColumnMapper,
}

impl ProductExplorer {
    pub fn new(
        gateway: Arc<dyn QueryGateway>,
        connection: ConnectionConfig,
        store: Arc<ConfigStore>,
        search: SearchSettings,
    ) -> Self {
        let executor = Arc::new(QueryExecutor::new(gateway, connection));
        let catalog = Arc::new(CatalogResolver::new(executor.clone(), store.clone()));
        let federated =
            FederatedSearch::new(catalog.clone(), store.clone(), executor.clone(), search);

        Self {
            executor,
            store,
            catalog,
            search: federated,
            mapper: ColumnMapper::new(),
        }
    }

    /// HTTP gateway and SQLite-backed store, as configured.
    pub fn from_settings(settings: &Settings) -> ExplorerResult<Self> {
        let gateway = Arc::new(HttpGateway::new(settings.resolved_endpoint()?)?);
        let storage = match settings.storage_path()? {
            Some(path) => SqliteConfigStorage::open_at(path)?,
            None => SqliteConfigStorage::open()?,
        };
        let store = Arc::new(ConfigStore::open(Arc::new(storage))?);
        Ok(Self::new(gateway, settings.connection()?, store, settings.search))
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn catalog(&self) -> &Arc<CatalogResolver> {
        &self.catalog
    }

    // ------------------------------------------------------------------------
    // Query operations
    // ------------------------------------------------------------------------

    pub async fn list_tables(&self) -> QueryOutcome<Vec<String>> {
        self.catalog.list_candidate_tables().await.into()
    }

    pub async fn list_columns(&self, table: &str) -> QueryOutcome<Vec<String>> {
        self.catalog.list_columns(table).await.into()
    }

    pub async fn search(&self, term: &str) -> QueryOutcome<SearchResult> {
        self.search.search(term).await.into()
    }

    pub async fn search_grouped(&self, term: &str) -> QueryOutcome<GroupedSearch> {
        self.search
            .search(term)
            .await
            .map(|result| GroupedSearch {
                groups: group_by_identity(&result.rows),
                result,
            })
            .into()
    }

    /// Whether `generation` is from the latest search.
    pub fn is_current(&self, generation: u64) -> bool {
        self.search.is_current(generation)
    }

    /// Run an arbitrary read-only statement.
    pub async fn execute_query(&self, query: &str, params: Vec<Value>) -> QueryOutcome<Vec<Row>> {
        self.executor.execute(query, params).await.into()
    }

    // ------------------------------------------------------------------------
    // Table configuration
    // ------------------------------------------------------------------------

    pub async fn set_enabled(&self, table: &str, enabled: bool) -> ExplorerResult<()> {
        self.ensure_registered(table).await?;
        Ok(self.store.set_enabled(table, enabled)?)
    }

    pub async fn mapping(&self, table: &str) -> ExplorerResult<TableMappingView> {
        self.ensure_registered(table).await?;
        let columns = self.catalog.list_columns(table).await?;
        let overrides = self
            .store
            .get(table)
            .map(|config| config.column_mapping)
            .unwrap_or_default();

        Ok(TableMappingView {
            table: table.to_string(),
            effective: self.mapper.effective_mapping(&columns, &overrides),
            diagnostics: self.mapper.diagnose(&columns),
            overrides,
            columns,
        })
    }

    /// Merge automatic matches into the stored overrides. Returns the fields added.
    pub async fn auto_map_table(&self, table: &str) -> ExplorerResult<Vec<CanonicalField>> {
        self.ensure_registered(table).await?;
        let columns = self.catalog.list_columns(table).await?;
        let auto = self.mapper.auto_map(&columns);
        Ok(self.store.merge_auto_mapping(table, &auto)?)
    }

    pub async fn set_field_mapping(
        &self,
        table: &str,
        field: CanonicalField,
        column: Option<String>,
    ) -> ExplorerResult<()> {
        self.ensure_registered(table).await?;
        Ok(self.store.set_field_mapping(table, field, column)?)
    }

    pub async fn clear_mapping(&self, table: &str) -> ExplorerResult<()> {
        self.ensure_registered(table).await?;
        Ok(self.store.clear_mapping(table)?)
    }

    pub async fn diagnose(&self, table: &str) -> ExplorerResult<Vec<MappingDiagnostic>> {
        let columns = self.catalog.list_columns(table).await?;
        Ok(self.mapper.diagnose(&columns))
    }

    /// Run discovery when `table` has no config yet.
    async fn ensure_registered(&self, table: &str) -> ExplorerResult<()> {
        if self.store.get(table).is_none() {
            self.catalog.list_candidate_tables().await?;
        }
        if self.store.get(table).is_none() {
            return Err(StoreError::UnknownTable(table.to_string()).into());
        }
        Ok(())
    }
}
