use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::entity::RevokedToken;
use crate::domain::DomainError;

#[async_trait]
pub trait RevokedTokenRepository: Send + Sync + Debug {
    async fn is_revoked(&self, token: &str) -> Result<bool, DomainError>;

    async fn insert(&self, token: RevokedToken) -> Result<(), DomainError>;

    /// Remove entries that expired before `now`
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
