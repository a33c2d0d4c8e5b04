//! TOML-based configuration for prodscope.
//!
//! Supports a config file (prodscope.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [gateway]
//! endpoint = "http://localhost:3001/api/query"
//!
//! [database]
//! host = "db.internal"
//! port = 5432
//! database = "catalog"
//! user = "reader"
//! password = "${CATALOG_DB_PASSWORD}"
//!
//! [search]
//! max_tables = 5
//! row_limit = 100
//!
//! [storage]
//! path = "~/.prodscope/config.db"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::connection::ConnectionConfig;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub gateway: GatewaySettings,
    pub database: DatabaseSettings,
    pub search: SearchSettings,
    pub storage: StorageSettings,
}

/// Query gateway endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// URL receiving POSTed query requests (supports ${ENV_VAR} expansion).
    pub endpoint: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3001/api/query".to_string(),
        }
    }
}

/// Connection details forwarded to the gateway with every request.
///
/// All string fields support ${ENV_VAR} expansion.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: ConnectionConfig::DEFAULT_PORT,
            database: String::new(),
            user: String::new(),
            password: String::new(),
        }
    }
}

/// Federated search bounds.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Maximum number of tables fanned out per search.
    pub max_tables: usize,

    /// Global row limit applied to the unioned query.
    pub row_limit: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_tables: 5,
            row_limit: 100,
        }
    }
}

/// Where table configuration is persisted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// SQLite file path. Defaults to `~/.prodscope/config.db`.
    pub path: Option<String>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `PRODSCOPE_CONFIG`
    /// 2. `./prodscope.toml`
    /// 3. `~/.config/prodscope/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("PRODSCOPE_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("prodscope.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("prodscope").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.search.max_tables == 0 {
            return Err(SettingsError::InvalidConfig(
                "search.max_tables must be at least 1".to_string(),
            ));
        }
        if self.search.row_limit == 0 {
            return Err(SettingsError::InvalidConfig(
                "search.row_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Gateway endpoint with environment variables expanded.
    pub fn resolved_endpoint(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.gateway.endpoint)
    }

    /// Build the connection configuration, expanding environment variables.
    ///
    /// Fields left blank in the file fall back to `PRODSCOPE_DB_*`
    /// variables. Completeness is checked later, before the first query.
    pub fn connection(&self) -> Result<ConnectionConfig, SettingsError> {
        let db = &self.database;
        let from_env = ConnectionConfig::from_env();
        let pick = |value: &str, fallback: &str| -> Result<String, SettingsError> {
            if value.is_empty() {
                Ok(fallback.to_string())
            } else {
                expand_env_vars(value)
            }
        };

        Ok(ConnectionConfig {
            host: pick(&db.host, &from_env.host)?,
            port: db.port,
            database: pick(&db.database, &from_env.database)?,
            user: pick(&db.user, &from_env.user)?,
            password: pick(&db.password, &from_env.password)?,
        })
    }

    /// SQLite path for persisted table configuration.
    pub fn storage_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        match &self.storage.path {
            Some(path) => {
                let expanded = expand_env_vars(path)?;
                Ok(Some(expand_home(&expanded)))
            }
            None => Ok(None),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.peek() == Some(&'{') {
            chars.next();
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            let mut name = String::new();
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                name.push(ch);
                chars.next();
            }
            if name.is_empty() {
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
