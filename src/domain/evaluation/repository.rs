use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::entity::{Evaluation, NewEvaluation};
use super::history::ChatHistory;
use crate::domain::DomainError;

/// Repository trait for evaluation storage
#[async_trait]
pub trait EvaluationRepository: Send + Sync + Debug {
    /// Most recent evaluation for the user and chart
    async fn latest(&self, user: &str, chart: &str) -> Result<Option<Evaluation>, DomainError>;

    async fn create(&self, evaluation: NewEvaluation) -> Result<Evaluation, DomainError>;

    /// Replace the conversation and bump the timestamp
    async fn update_history(
        &self,
        id: i64,
        chat_history: &ChatHistory,
        timestamp: DateTime<Utc>,
    ) -> Result<Evaluation, DomainError>;

    /// Delete every evaluation, returning how many were removed
    async fn delete_all(&self) -> Result<u64, DomainError>;
}
