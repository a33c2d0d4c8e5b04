//! Core-side query execution.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::error::QueryResult;
use super::guard::ensure_read_only;
use super::protocol::GatewayRequest;
use super::QueryGateway;
use crate::config::ConnectionConfig;
use crate::model::Row;

/// Validates and forwards queries to a [`QueryGateway`].
///
/// Checks run in order, each before any network call:
/// 1. connection configuration is complete ([`QueryError::Config`](super::QueryError::Config))
/// 2. the query is a SELECT ([`QueryError::Validation`](super::QueryError::Validation))
pub struct QueryExecutor {
    gateway: Arc<dyn QueryGateway>,
    connection: ConnectionConfig,
}

impl QueryExecutor {
    pub fn new(gateway: Arc<dyn QueryGateway>, connection: ConnectionConfig) -> Self {
        Self {
            gateway,
            connection,
        }
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    /// Execute a read-only query with positional parameters.
    pub async fn execute(&self, query: &str, params: Vec<Value>) -> QueryResult<Vec<Row>> {
        self.connection.validate()?;
        ensure_read_only(query)?;

        debug!(params = params.len(), "executing query:\n{}", query);
        let request = GatewayRequest::read_only(query, params, self.connection.clone());
        let rows = self.gateway.execute(request).await?;
        debug!(rows = rows.len(), "query returned");
        Ok(rows)
    }
}
