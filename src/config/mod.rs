//! Configuration module for prodscope.
//!
//! Handles the settings file, environment variables and the connection
//! details forwarded to the query gateway.

mod connection;
mod settings;

pub use connection::{ConnectionConfig, ConnectionError};
pub use settings::{
    expand_env_vars, DatabaseSettings, GatewaySettings, SearchSettings, Settings, SettingsError,
    StorageSettings,
};
