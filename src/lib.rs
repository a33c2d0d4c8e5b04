//! # prodscope
//!
//! Schema discovery, federated search and product reconciliation over
//! product tables whose column names are not known in advance.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 ProductExplorer (service)                │
//! └─────────────────────────────────────────────────────────┘
//!                          │ search term
//!                          ▼ [search]
//! ┌─────────────────────────────────────────────────────────┐
//! │   FederatedSearch: classify → candidates → branches      │
//! │   (catalog: tables/columns, mapping: column → field)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │ UNION ALL, one parameter
//!                          ▼ [gateway]
//! ┌─────────────────────────────────────────────────────────┐
//! │    QueryExecutor: config check, read-only guard          │
//! │    dyn QueryGateway (HTTP / scripted)                    │
//! └─────────────────────────────────────────────────────────┘
//!                          │ Vec<NormalizedProductRow>
//!                          ▼ [reconcile]
//! ┌─────────────────────────────────────────────────────────┐
//! │    ProductGroup: identity grouping, conflict detection   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Table configuration (enabled flag, field sets, mapping overrides) lives in
//! the [`store::ConfigStore`], persisted to SQLite.

pub mod catalog;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod reconcile;
pub mod search;
pub mod service;
pub mod sql;
pub mod store;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::CatalogResolver;
    pub use crate::config::{ConnectionConfig, Settings};
    pub use crate::gateway::{
        HttpGateway, QueryError, QueryExecutor, QueryGateway, QueryResult, ScriptedGateway,
    };
    pub use crate::mapping::ColumnMapper;
    pub use crate::model::{
        CanonicalField, ColumnMapping, FieldValue, NormalizedProductRow, TableConfig,
    };
    pub use crate::reconcile::{
        group_by_identity, ConsolidatedProduct, FieldResolution, GroupKeyKind, ProductGroup,
    };
    pub use crate::search::{FederatedSearch, SearchMode, SearchResult};
    pub use crate::service::{ProductExplorer, QueryOutcome};
    pub use crate::store::{ConfigStore, MemoryConfigStorage, SqliteConfigStorage};
}

pub use gateway::{QueryError, QueryResult};
pub use model::{CanonicalField, NormalizedProductRow};
pub use service::ProductExplorer;
