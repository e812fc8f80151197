use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::token::{RevokedToken, RevokedTokenRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
pub struct InMemoryRevokedTokenRepository {
    tokens: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryRevokedTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevokedTokenRepository for InMemoryRevokedTokenRepository {
    async fn is_revoked(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.tokens.read().await.contains_key(token))
    }

    async fn insert(&self, token: RevokedToken) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token.token) {
            return Err(DomainError::validation("Token is already revoked"));
        }

        tokens.insert(token.token, token.expires_at);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, expires_at| *expires_at > now);
        Ok((before - tokens.len()) as u64)
    }
}
