//! Query error taxonomy.

use thiserror::Error;

use crate::config::ConnectionError;
use crate::model::RowError;

/// Result type for gateway-backed operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors surfaced by any query path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Missing or incomplete connection configuration.
    #[error("{0}")]
    Config(String),

    /// Query rejected locally before any network call.
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response from the gateway.
    #[error("{message}")]
    Gateway {
        /// HTTP status code.
        status: u16,
        message: String,
    },

    /// Transport failure (connection refused, DNS, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The database behind the gateway reported an error.
    #[error("Database error: {0}")]
    Database(String),

    /// The gateway answered with a payload that could not be decoded.
    #[error("Malformed gateway response: {0}")]
    Decode(String),
}

impl QueryError {
    /// Build a gateway error with a message derived from the HTTP status.
    pub fn from_status(status: u16) -> Self {
        let message = match status {
            401 => "Authentication failed: the gateway rejected the credentials".to_string(),
            403 => "Forbidden: the gateway only accepts read-only SELECT queries".to_string(),
            404 => "Query endpoint not found: check the gateway URL".to_string(),
            500 => "Internal server error in the query gateway".to_string(),
            503 => "Query gateway unavailable, try again later".to_string(),
            other => format!("Gateway request failed with HTTP status {}", other),
        };
        Self::Gateway { status, message }
    }

    /// Whether re-issuing the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Gateway { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Short category name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::Gateway { .. } => "gateway",
            Self::Network(_) => "network",
            Self::Database(_) => "database",
            Self::Decode(_) => "decode",
        }
    }
}

impl From<ConnectionError> for QueryError {
    fn from(err: ConnectionError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<RowError> for QueryError {
    fn from(err: RowError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
