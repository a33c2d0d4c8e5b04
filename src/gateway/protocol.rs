//! Wire types for the query gateway.
//!
//! Requests are POSTed as JSON:
//!
//! ```text
//! { "query": "...", "params": [...], "readOnly": true,
//!   "dbConfig": { "host", "port", "database", "user", "password" } }
//! ```
//!
//! and answered with `{ "data": [row] | null, "count": n, "error": string | null }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{QueryError, QueryResult};
use crate::config::ConnectionConfig;
use crate::model::Row;

/// Request envelope sent to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    pub query: String,
    pub params: Vec<Value>,
    pub read_only: bool,
    pub db_config: ConnectionConfig,
}

impl GatewayRequest {
    /// A read-only request. The core never sends anything else.
    pub fn read_only(
        query: impl Into<String>,
        params: Vec<Value>,
        db_config: ConnectionConfig,
    ) -> Self {
        Self {
            query: query.into(),
            params,
            read_only: true,
            db_config,
        }
    }
}

/// Response envelope received from the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    #[serde(default)]
    pub data: Option<Vec<Row>>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub error: Option<String>,
}

impl GatewayResponse {
    /// Rows on success; a reported `error` becomes [`QueryError::Database`].
    pub fn into_rows(self) -> QueryResult<Vec<Row>> {
        match self.error {
            Some(message) => Err(QueryError::Database(message)),
            None => Ok(self.data.unwrap_or_default()),
        }
    }
}
