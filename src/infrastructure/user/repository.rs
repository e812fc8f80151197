//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository, keyed by username
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.username().to_string(), user))
            .collect();

        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.contains_key(user.username()) {
            return Err(DomainError::conflict(
                "User with this username already exists",
            ));
        }

        users.insert(user.username().to_string(), user.clone());
        Ok(user)
    }

    async fn update(&self, username: &str, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if !users.contains_key(username) {
            return Err(DomainError::not_found("User not found"));
        }

        if user.username() != username && users.contains_key(user.username()) {
            return Err(DomainError::conflict(
                "User with this username already exists",
            ));
        }

        users.remove(username);
        users.insert(user.username().to_string(), user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.users.write().await.remove(username).is_some())
    }

    async fn replace_all(&self, users: Vec<User>) -> Result<usize, DomainError> {
        let mut replacement = BTreeMap::new();

        for user in users {
            let username = user.username().to_string();
            if replacement.insert(username.clone(), user).is_some() {
                return Err(DomainError::conflict(format!(
                    "Duplicate username '{}'",
                    username
                )));
            }
        }

        let count = replacement.len();
        *self.users.write().await = replacement;
        Ok(count)
    }
}
