//! Search term classification.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DIGITS_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// How a term is matched against searchable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// All-digit term: equality against barcode-like columns.
    Exact,
    /// Anything else: case-insensitive substring match.
    Fuzzy,
}

impl SearchMode {
    /// Classify a term. Blank terms yield `None` (no search).
    pub fn classify(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            None
        } else if DIGITS_ONLY.is_match(term) {
            Some(SearchMode::Exact)
        } else {
            Some(SearchMode::Fuzzy)
        }
    }

    /// The single bound parameter for `term`.
    pub fn parameter(&self, term: &str) -> String {
        let term = term.trim();
        match self {
            SearchMode::Exact => term.to_string(),
            SearchMode::Fuzzy => format!("%{}%", term),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Exact => "exact",
            SearchMode::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
