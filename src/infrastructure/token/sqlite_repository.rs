use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::domain::token::{RevokedToken, RevokedTokenRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

#[derive(Debug, Clone)]
pub struct SqliteRevokedTokenRepository {
    pool: SqlitePool,
}

impl SqliteRevokedTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevokedTokenRepository for SqliteRevokedTokenRepository {
    async fn is_revoked(&self, token: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token = ?)")
            .bind(token)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check revoked token: {}", e)))
    }

    async fn insert(&self, token: RevokedToken) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO revoked_tokens (token, expires_at) VALUES (?, ?)")
            .bind(&token.token)
            .bind(token.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::validation("Token is already revoked")
                } else {
                    DomainError::storage(format!("Failed to revoke token: {}", e))
                }
            })?;

        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to purge revoked tokens: {}", e)))?;

        Ok(result.rows_affected())
    }
}
