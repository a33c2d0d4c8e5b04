//! HTTP transport to the remote query gateway.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use tracing::warn;

use super::error::{QueryError, QueryResult};
use super::protocol::{GatewayRequest, GatewayResponse};
use super::QueryGateway;
use crate::model::Row;

/// Posts [`GatewayRequest`]s as JSON to a fixed endpoint.
///
/// No retries and no client-side timeout: resilience belongs to the
/// gateway itself.
pub struct HttpGateway {
    client: Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(endpoint: impl Into<String>) -> QueryResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| QueryError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QueryGateway for HttpGateway {
    async fn execute(&self, request: GatewayRequest) -> QueryResult<Vec<Row>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(USER_AGENT, concat!("prodscope/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| QueryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let err = QueryError::from_status(status.as_u16());
            warn!(status = status.as_u16(), "gateway request failed: {}", err);
            return Err(err);
        }

        let body: GatewayResponse = response
            .json()
            .await
            .map_err(|e| QueryError::Decode(e.to_string()))?;
        body.into_rows()
    }
}
