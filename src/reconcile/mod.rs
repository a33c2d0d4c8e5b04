//! Product reconciliation: grouping rows that describe the same product
//! and surfacing field conflicts between their sources.
//!
//! ```text
//! rows ──► IdentityKey (barcode > ean > supplier_code > id@table)
//!      ──► ProductGroup (global, largest first)
//!      ──► consolidate() ──► FieldResolution per field
//! ```

mod consolidate;
mod group;
mod identity;

pub use consolidate::{ConsolidatedProduct, FieldResolution};
pub use group::{group_by_identity, ProductGroup};
pub use identity::GroupKeyKind;
