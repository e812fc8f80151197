//! Database migrations infrastructure

use async_trait::async_trait;
use sqlx::{Executor, SqliteConnection, SqlitePool};
use tracing::info;

use crate::domain::DomainError;

/// Trait for running database migrations
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Runs all pending migrations
    async fn run(&self) -> Result<(), DomainError>;

    /// Returns the current migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// SQLite migrator applying the embedded schema migrations
#[derive(Debug)]
pub struct SqliteMigrator {
    pool: SqlitePool,
    migrations: Vec<Migration>,
}

impl SqliteMigrator {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_migrations(pool, schema_migrations())
    }

    pub fn with_migrations(pool: SqlitePool, migrations: Vec<Migration>) -> Self {
        Self { pool, migrations }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Runs a single migration inside a transaction
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = ?)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if applied {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin migration: {}", e)))?;

        (&mut *tx as &mut SqliteConnection)
            .execute(sqlx::raw_sql(&migration.up))
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        info!(
            version = migration.version,
            description = %migration.description,
            "Applied migration"
        );

        Ok(true)
    }
}

#[async_trait]
impl Migrator for SqliteMigrator {
    async fn run(&self) -> Result<(), DomainError> {
        for migration in &self.migrations {
            self.run_migration(migration).await?;
        }

        Ok(())
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version, ascending
    pub version: i64,
    /// Human-readable description
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
}

impl Migration {
    pub fn new(version: i64, description: impl Into<String>, up: impl Into<String>) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
        }
    }
}

/// Schema of the evaluation database
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY NOT NULL,
                full_name TEXT NOT NULL,
                disabled INTEGER NOT NULL DEFAULT 0,
                type TEXT NOT NULL,
                password TEXT NOT NULL
            );
            "#,
        ),
        Migration::new(
            2,
            "Create charts table",
            r#"
            CREATE TABLE IF NOT EXISTS charts (
                name TEXT PRIMARY KEY NOT NULL,
                description TEXT NOT NULL,
                instruction TEXT NOT NULL,
                url TEXT NOT NULL
            );
            "#,
        ),
        Migration::new(
            3,
            "Create evaluations table",
            r#"
            CREATE TABLE IF NOT EXISTS evaluations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE ON UPDATE CASCADE,
                chart TEXT NOT NULL REFERENCES charts(name) ON DELETE CASCADE ON UPDATE CASCADE,
                timestamp TEXT NOT NULL,
                chat_history BLOB NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_evaluations_user_chart
                ON evaluations(user, chart, timestamp);
            "#,
        ),
        Migration::new(
            4,
            "Create revoked tokens table",
            r#"
            CREATE TABLE IF NOT EXISTS revoked_tokens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                token TEXT NOT NULL UNIQUE,
                expires_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_revoked_tokens_expires_at
                ON revoked_tokens(expires_at);
            "#,
        ),
    ]
}

/// Runs all pending schema migrations and returns the resulting version
pub async fn run_schema_migrations(pool: &SqlitePool) -> Result<Option<i64>, DomainError> {
    let migrator = SqliteMigrator::new(pool.clone());
    migrator.run().await?;
    migrator.version().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::connect_in_memory;

    #[test]
    fn test_schema_migrations_order() {
        let migrations = schema_migrations();

        assert!(!migrations.is_empty());

        for i in 1..migrations.len() {
            assert!(
                migrations[i].version > migrations[i - 1].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        let migrator = SqliteMigrator::new(pool.clone());

        migrator.run().await.unwrap();
        migrator.run().await.unwrap();

        assert_eq!(migrator.version().await.unwrap(), Some(4));

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(
            tables,
            vec!["_migrations", "charts", "evaluations", "revoked_tokens", "users"]
        );
    }

    #[tokio::test]
    async fn test_run_migration_reports_skip() {
        let pool = connect_in_memory().await.unwrap();
        let migrator = SqliteMigrator::with_migrations(pool, vec![]);
        let migration = Migration::new(10, "Create t", "CREATE TABLE t (id INTEGER);");

        assert!(migrator.run_migration(&migration).await.unwrap());
        assert!(!migrator.run_migration(&migration).await.unwrap());
    }
}
