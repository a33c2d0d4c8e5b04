//! Federated product search.
//!
//! # Flow
//!
//! ```text
//! term ──► SearchMode::classify ──► candidate tables (enabled, else all)
//!                                        │ cap to max_tables
//!                                        ▼
//!                   per table: columns → searchable columns → branch
//!                                        │
//!                                        ▼
//!                     UNION ALL ... LIMIT n, one parameter $1
//!                                        │
//!                                        ▼
//!                              Vec<NormalizedProductRow>
//! ```

mod builder;
mod federated;
mod mode;

pub use builder::{
    build_projection, build_search_predicate, project, searchable_columns, FederatedQuery,
    DEFAULT_ROW_LIMIT, EAN_COLUMNS, FUZZY_COLUMNS,
};
pub use federated::{FederatedSearch, SearchResult};
pub use mode::SearchMode;
