//! SQLite user repository implementation

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::domain::user::{User, UserRepository, UserType};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

const DUPLICATE_USERNAME: &str = "User with this username already exists";

/// SQLite implementation of UserRepository
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT username, full_name, disabled, type, password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (username, full_name, disabled, type, password)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.username())
        .bind(user.full_name())
        .bind(user.is_disabled())
        .bind(user.user_type().as_str())
        .bind(user.password_hash())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(DUPLICATE_USERNAME)
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn update(&self, username: &str, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = ?, full_name = ?, disabled = ?, type = ?, password = ?
            WHERE username = ?
            "#,
        )
        .bind(user.username())
        .bind(user.full_name())
        .bind(user.is_disabled())
        .bind(user.user_type().as_str())
        .bind(user.password_hash())
        .bind(username)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(DUPLICATE_USERNAME)
            } else {
                DomainError::storage(format!("Failed to update user: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("User not found"));
        }

        Ok(user.clone())
    }

    async fn delete(&self, username: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace_all(&self, users: Vec<User>) -> Result<usize, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("DELETE FROM users")
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete users: {}", e)))?;

        for user in &users {
            sqlx::query(
                r#"
                INSERT INTO users (username, full_name, disabled, type, password)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(user.username())
            .bind(user.full_name())
            .bind(user.is_disabled())
            .bind(user.user_type().as_str())
            .bind(user.password_hash())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::conflict(format!("Duplicate username '{}'", user.username()))
                } else {
                    DomainError::storage(format!("Failed to insert user: {}", e))
                }
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit users: {}", e)))?;

        Ok(users.len())
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode user: {}", e));

    let user_type: String = row.try_get("type").map_err(decode)?;
    let user_type = user_type
        .parse::<UserType>()
        .map_err(|e| DomainError::storage(e.to_string()))?;

    Ok(User::new(
        row.try_get::<String, _>("username").map_err(decode)?,
        row.try_get::<String, _>("full_name").map_err(decode)?,
        user_type,
        row.try_get::<String, _>("password").map_err(decode)?,
    )
    .with_disabled(row.try_get("disabled").map_err(decode)?))
}
