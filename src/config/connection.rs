//! Database connection configuration.
//!
//! The connection is never opened locally: it travels with every gateway
//! request as `dbConfig`. Supports configuration via environment variables:
//! - `PRODSCOPE_DB_HOST`: Database server hostname
//! - `PRODSCOPE_DB_PORT`: Port (optional, defaults to 5432)
//! - `PRODSCOPE_DB_NAME`: Database name
//! - `PRODSCOPE_DB_USER`: Username
//! - `PRODSCOPE_DB_PASSWORD`: Password

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Error type for connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("Database connection is not configured: missing {}", .missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },
}

/// Database connection configuration, serialized as the gateway's `dbConfig`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ConnectionConfig {
    pub const DEFAULT_PORT: u16 = 5432;

    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            database: database.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Unset variables leave the field empty; [`validate`](Self::validate)
    /// reports them before any query is attempted.
    pub fn from_env() -> Self {
        let port = env::var("PRODSCOPE_DB_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(Self::DEFAULT_PORT);

        Self {
            host: env::var("PRODSCOPE_DB_HOST").unwrap_or_default(),
            port,
            database: env::var("PRODSCOPE_DB_NAME").unwrap_or_default(),
            user: env::var("PRODSCOPE_DB_USER").unwrap_or_default(),
            password: env::var("PRODSCOPE_DB_PASSWORD").unwrap_or_default(),
        }
    }

    /// Check that every field needed by the gateway is present.
    pub fn validate(&self) -> Result<(), ConnectionError> {
        let mut missing = Vec::new();
        if self.host.trim().is_empty() {
            missing.push("host");
        }
        if self.port == 0 {
            missing.push("port");
        }
        if self.database.trim().is_empty() {
            missing.push("database");
        }
        if self.user.trim().is_empty() {
            missing.push("user");
        }
        if self.password.is_empty() {
            missing.push("password");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConnectionError::Incomplete { missing })
        }
    }
}

// Keep the password out of logs.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}
