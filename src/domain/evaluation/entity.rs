use chrono::{DateTime, Utc};

use super::history::ChatHistory;

/// Stored evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub id: i64,
    /// Username of the owner
    pub user: String,
    /// Name of the evaluated chart
    pub chart: String,
    /// Time of the last exchange
    pub timestamp: DateTime<Utc>,
    pub chat_history: ChatHistory,
}

/// Evaluation not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvaluation {
    pub user: String,
    pub chart: String,
    pub timestamp: DateTime<Utc>,
    pub chat_history: ChatHistory,
}

impl NewEvaluation {
    pub fn into_evaluation(self, id: i64) -> Evaluation {
        Evaluation {
            id,
            user: self.user,
            chart: self.chart,
            timestamp: self.timestamp,
            chat_history: self.chat_history,
        }
    }
}
