//! Query execution gateway.
//!
//! The remote SQL executor is an external collaborator; the core only sees
//! the [`QueryGateway`] trait.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                QueryExecutor                 │
//! │  config check → read-only guard → gateway    │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │              dyn QueryGateway                │
//! │  HttpGateway (JSON POST) | ScriptedGateway   │
//! └──────────────────────────────────────────────┘
//! ```

mod error;
mod executor;
mod guard;
mod http;
mod protocol;
mod scripted;

use async_trait::async_trait;

pub use error::{QueryError, QueryResult};
pub use executor::QueryExecutor;
pub use guard::{ensure_read_only, is_read_only};
pub use http::HttpGateway;
pub use protocol::{GatewayRequest, GatewayResponse};
pub use scripted::ScriptedGateway;

use crate::model::Row;

/// A remote read-only SQL execution capability.
#[async_trait]
pub trait QueryGateway: Send + Sync {
    /// Execute one request, returning its rows.
    async fn execute(&self, request: GatewayRequest) -> QueryResult<Vec<Row>>;
}
