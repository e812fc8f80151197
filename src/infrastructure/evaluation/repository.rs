//! In-memory evaluation repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::evaluation::{ChatHistory, Evaluation, EvaluationRepository, NewEvaluation};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    evaluations: Vec<Evaluation>,
}

/// In-memory implementation of EvaluationRepository
#[derive(Debug, Default)]
pub struct InMemoryEvaluationRepository {
    store: RwLock<Store>,
}

impl InMemoryEvaluationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EvaluationRepository for InMemoryEvaluationRepository {
    async fn latest(&self, user: &str, chart: &str) -> Result<Option<Evaluation>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .evaluations
            .iter()
            .filter(|e| e.user == user && e.chart == chart)
            .max_by_key(|e| (e.timestamp, e.id))
            .cloned())
    }

    async fn create(&self, evaluation: NewEvaluation) -> Result<Evaluation, DomainError> {
        let mut store = self.store.write().await;
        store.next_id += 1;

        let evaluation = evaluation.into_evaluation(store.next_id);
        store.evaluations.push(evaluation.clone());

        Ok(evaluation)
    }

    async fn update_history(
        &self,
        id: i64,
        chat_history: &ChatHistory,
        timestamp: DateTime<Utc>,
    ) -> Result<Evaluation, DomainError> {
        let mut store = self.store.write().await;

        let evaluation = store
            .evaluations
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DomainError::not_found("Evaluation not found"))?;

        evaluation.chat_history = chat_history.clone();
        evaluation.timestamp = timestamp;

        Ok(evaluation.clone())
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let mut store = self.store.write().await;
        let count = store.evaluations.len() as u64;
        store.evaluations.clear();
        Ok(count)
    }
}
