//! SQLite connection pool setup

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

/// Open the database described by `config`, creating the file if needed
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DomainError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DomainError::configuration(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    info!(url = %config.url, "Connecting to SQLite");

    SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .connect_with(options)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to SQLite: {}", e)))
}

/// Private in-memory database; a single connection keeps every query on the same database
pub async fn connect_in_memory() -> Result<SqlitePool, DomainError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| DomainError::configuration(format!("Invalid database URL: {}", e)))?
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to open in-memory SQLite: {}", e)))
}

/// Whether a sqlx error is a UNIQUE or PRIMARY KEY constraint violation
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}
