//! Federated search across discovered tables.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use super::builder::FederatedQuery;
use super::mode::SearchMode;
use crate::catalog::CatalogResolver;
use crate::config::SearchSettings;
use crate::gateway::{QueryExecutor, QueryResult};
use crate::mapping::ColumnMapper;
use crate::model::NormalizedProductRow;
use crate::store::ConfigStore;

/// Outcome of one search cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResult {
    /// The trimmed term.
    pub term: String,
    /// `None` when the term was blank and nothing was searched.
    pub mode: Option<SearchMode>,
    /// Stamp used to discard responses that arrive after a newer search.
    pub generation: u64,
    pub rows: Vec<NormalizedProductRow>,
    /// Tables that contributed a branch to the query.
    pub tables_searched: Vec<String>,
    /// Candidates skipped by the table cap.
    pub truncated_tables: Vec<String>,
    /// Candidates whose column introspection failed.
    pub failed_tables: Vec<String>,
}

/// Runs one UNION ALL query over every searchable candidate table.
pub struct FederatedSearch {
    catalog: Arc<CatalogResolver>,
    store: Arc<ConfigStore>,
    executor: Arc<QueryExecutor>,
    mapper: ColumnMapper,
    settings: SearchSettings,
    generation: AtomicU64,
}

impl FederatedSearch {
    pub fn new(
        catalog: Arc<CatalogResolver>,
        store: Arc<ConfigStore>,
        executor: Arc<QueryExecutor>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            catalog,
            store,
            executor,
            mapper: ColumnMapper::new(),
            settings,
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_mapper(mut self, mapper: ColumnMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn settings(&self) -> SearchSettings {
        self.settings
    }

    /// Whether `generation` belongs to the most recently started search.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Search every candidate table for `term`.
    ///
    /// A blank term returns an empty result without any gateway call, as
    /// does a search where no candidate table has a searchable column.
    pub async fn search(&self, term: &str) -> QueryResult<SearchResult> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let term = term.trim();
        let mut result = SearchResult {
            term: term.to_string(),
            generation,
            ..Default::default()
        };

        let Some(mode) = SearchMode::classify(term) else {
            debug!("blank search term, nothing to do");
            return Ok(result);
        };
        result.mode = Some(mode);

        let candidates = self.candidate_tables().await?;
        let cap = self.settings.max_tables.min(candidates.len());
        let (selected, truncated) = candidates.split_at(cap);
        if !truncated.is_empty() {
            warn!(
                max_tables = self.settings.max_tables,
                skipped = ?truncated,
                "table cap reached, skipping remaining candidates"
            );
            result.truncated_tables = truncated.to_vec();
        }

        let configs = self.store.snapshot();
        let mut query = FederatedQuery::new(mode).row_limit(self.settings.row_limit);
        for table in selected {
            let columns = match self.catalog.list_columns(table).await {
                Ok(columns) => columns,
                Err(err) => {
                    warn!(
                        table = %table,
                        error = %err,
                        "skipping table: column introspection failed"
                    );
                    result.failed_tables.push(table.clone());
                    continue;
                }
            };
            let config = configs.iter().find(|c| &c.name == table);
            if !query.add_table(&self.mapper, table, &columns, config) {
                debug!(table = %table, mode = %mode, "no searchable columns");
            }
        }

        if query.is_empty() {
            info!(term, mode = %mode, "no searchable tables");
            return Ok(result);
        }

        let sql = query.to_sql();
        let rows = self
            .executor
            .execute(&sql, vec![json!(query.parameter(term))])
            .await?;
        result.rows = rows
            .iter()
            .map(NormalizedProductRow::from_json_row)
            .collect::<Result<Vec<_>, _>>()?;
        result.tables_searched = query.tables().to_vec();

        info!(
            term,
            mode = %mode,
            tables = result.tables_searched.len(),
            rows = result.rows.len(),
            "search complete"
        );
        Ok(result)
    }

    /// Enabled tables when any are enabled, otherwise everything discovered.
    async fn candidate_tables(&self) -> QueryResult<Vec<String>> {
        let discovered = self.catalog.list_candidate_tables().await?;
        let enabled = self.store.enabled_tables();
        if enabled.is_empty() {
            return Ok(discovered);
        }
        Ok(discovered
            .into_iter()
            .filter(|table| enabled.contains(table))
            .collect())
    }
}
