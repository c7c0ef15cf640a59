//! Service configuration
//!
//! Database connection parameters and pool sizing. Values arrive through
//! the CLI, which reads them from process environment variables.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid sslmode: '{0}'")]
    InvalidSslMode(String),

    #[error("{0} must be > 0")]
    Zero(&'static str),
}

/// PostgreSQL connection settings
#[derive(Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub dbname: String,

    /// libpq sslmode (disable, allow, prefer, require, verify-ca, verify-full)
    pub sslmode: String,

    pub max_connections: u32,

    pub acquire_timeout_ms: u64,
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("sslmode", &self.sslmode)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_ms", &self.acquire_timeout_ms)
            .finish()
    }
}

impl DatabaseConfig {
    /// Check required settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Missing("HOST"));
        }
        if self.user.is_empty() {
            return Err(ConfigError::Missing("USER"));
        }
        if self.dbname.is_empty() {
            return Err(ConfigError::Missing("DBNAME"));
        }
        if self.port == 0 {
            return Err(ConfigError::Zero("PORT"));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Zero("DB_MAX_CONNECTIONS"));
        }
        self.ssl_mode()?;
        Ok(())
    }

    fn ssl_mode(&self) -> Result<PgSslMode, ConfigError> {
        PgSslMode::from_str(&self.sslmode)
            .map_err(|_| ConfigError::InvalidSslMode(self.sslmode.clone()))
    }

    /// Connection options built field by field, so credentials need no URL escaping
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let ssl_mode = self
            .ssl_mode()
            .map_err(|e| sqlx::Error::Configuration(e.to_string().into()))?;

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.dbname)
            .ssl_mode(ssl_mode))
    }
}
