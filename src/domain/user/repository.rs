//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::User;
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by username
    async fn get(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user; fails with `Conflict` if the username is taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Replace the user stored under `username`, which may rename it
    async fn update(&self, username: &str, user: &User) -> Result<User, DomainError>;

    /// Delete a user, returning whether it existed
    async fn delete(&self, username: &str) -> Result<bool, DomainError>;

    /// Atomically delete every user and insert `users`
    async fn replace_all(&self, users: Vec<User>) -> Result<usize, DomainError>;

    /// Check if a username exists
    async fn exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get(username).await?.is_some())
    }
}
