//! Schema catalog: which tables exist and what columns they have.
//!
//! ```text
//! information_schema.tables ──► list_candidate_tables ──► ConfigStore::register_tables
//! information_schema.columns ─► list_columns ──► DashMap cache (per table)
//! ```

mod introspection;
mod resolver;

pub use introspection::{LIST_COLUMNS_SQL, LIST_TABLES_SQL};
pub use resolver::CatalogResolver;
