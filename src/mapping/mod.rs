//! Column-to-canonical-field mapping.

mod mapper;
mod rules;

pub use mapper::{ColumnMapper, MappingDiagnostic};
pub use rules::{default_field_rules, ColumnPredicate, FieldRule, DEFAULT_FIELD_RULES};
