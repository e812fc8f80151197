//! SQLite evaluation repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::domain::evaluation::{ChatHistory, Evaluation, EvaluationRepository, NewEvaluation};
use crate::domain::DomainError;

/// SQLite implementation of EvaluationRepository
#[derive(Debug, Clone)]
pub struct SqliteEvaluationRepository {
    pool: SqlitePool,
}

impl SqliteEvaluationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn get(&self, id: i64) -> Result<Evaluation, DomainError> {
        let row = sqlx::query(
            "SELECT id, user, chart, timestamp, chat_history FROM evaluations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get evaluation: {}", e)))?;

        match row {
            Some(row) => row_to_evaluation(&row),
            None => Err(DomainError::not_found("Evaluation not found")),
        }
    }
}

#[async_trait]
impl EvaluationRepository for SqliteEvaluationRepository {
    async fn latest(&self, user: &str, chart: &str) -> Result<Option<Evaluation>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user, chart, timestamp, chat_history
            FROM evaluations
            WHERE user = ? AND chart = ?
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user)
        .bind(chart)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get evaluation: {}", e)))?;

        row.as_ref().map(row_to_evaluation).transpose()
    }

    async fn create(&self, evaluation: NewEvaluation) -> Result<Evaluation, DomainError> {
        let result = sqlx::query(
            "INSERT INTO evaluations (user, chart, timestamp, chat_history) VALUES (?, ?, ?, ?)",
        )
        .bind(&evaluation.user)
        .bind(&evaluation.chart)
        .bind(evaluation.timestamp)
        .bind(evaluation.chat_history.to_bytes()?)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create evaluation: {}", e)))?;

        Ok(evaluation.into_evaluation(result.last_insert_rowid()))
    }

    async fn update_history(
        &self,
        id: i64,
        chat_history: &ChatHistory,
        timestamp: DateTime<Utc>,
    ) -> Result<Evaluation, DomainError> {
        let result =
            sqlx::query("UPDATE evaluations SET chat_history = ?, timestamp = ? WHERE id = ?")
                .bind(chat_history.to_bytes()?)
                .bind(timestamp)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to update evaluation: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Evaluation not found"));
        }

        self.get(id).await
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM evaluations")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete evaluations: {}", e)))?;

        Ok(result.rows_affected())
    }
}

fn row_to_evaluation(row: &SqliteRow) -> Result<Evaluation, DomainError> {
    let decode =
        |e: sqlx::Error| DomainError::storage(format!("Failed to decode evaluation: {}", e));
    let chat_history: Vec<u8> = row.try_get("chat_history").map_err(decode)?;

    Ok(Evaluation {
        id: row.try_get("id").map_err(decode)?,
        user: row.try_get("user").map_err(decode)?,
        chart: row.try_get("chart").map_err(decode)?,
        timestamp: row.try_get("timestamp").map_err(decode)?,
        chat_history: ChatHistory::from_bytes(&chat_history)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::ChartRepository;
    use crate::domain::user::{User, UserRepository, UserType};
    use crate::domain::ChatMessage;
    use crate::infrastructure::chart::SqliteChartRepository;
    use crate::infrastructure::storage::{connect_in_memory, run_schema_migrations};
    use crate::infrastructure::user::SqliteUserRepository;
    use chrono::Duration;

    struct Fixture {
        pool: SqlitePool,
        repo: SqliteEvaluationRepository,
    }

    async fn fixture() -> Fixture {
        let pool = connect_in_memory().await.unwrap();
        run_schema_migrations(&pool).await.unwrap();

        SqliteUserRepository::new(pool.clone())
            .create(User::new("alice", "Alice", UserType::User, "hash"))
            .await
            .unwrap();
        SqliteChartRepository::new(pool.clone())
            .create(
                crate::domain::Chart::new("sales", "Sales", "Explain", "https://x/s.png").unwrap(),
            )
            .await
            .unwrap();

        Fixture {
            repo: SqliteEvaluationRepository::new(pool.clone()),
            pool,
        }
    }

    fn new_evaluation(timestamp: DateTime<Utc>) -> NewEvaluation {
        let mut chat_history = ChatHistory::start("Explain", "What is shown?", "https://x/s.png");
        chat_history.push(ChatMessage::assistant("Monthly sales."));

        NewEvaluation {
            user: "alice".to_string(),
            chart: "sales".to_string(),
            timestamp,
            chat_history,
        }
    }

    #[tokio::test]
    async fn test_create_and_latest() {
        let f = fixture().await;
        let now = Utc::now();

        f.repo.create(new_evaluation(now - Duration::hours(1))).await.unwrap();
        let newest = f.repo.create(new_evaluation(now)).await.unwrap();

        let latest = f.repo.latest("alice", "sales").await.unwrap().unwrap();
        assert_eq!(latest.id, newest.id);
        assert_eq!(latest.chat_history, newest.chat_history);
        assert!(f.repo.latest("alice", "other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_history() {
        let f = fixture().await;
        let created = f.repo.create(new_evaluation(Utc::now())).await.unwrap();

        let mut history = created.chat_history.clone();
        history.push(ChatMessage::user_question("Why?"));
        history.push(ChatMessage::assistant("Seasonality."));
        let later = created.timestamp + Duration::minutes(1);

        let updated = f.repo.update_history(created.id, &history, later).await.unwrap();
        assert_eq!(updated.chat_history.len(), 5);
        assert_eq!(updated.timestamp, later);
    }

    #[tokio::test]
    async fn test_unknown_user_is_rejected() {
        let f = fixture().await;
        let mut evaluation = new_evaluation(Utc::now());
        evaluation.user = "ghost".to_string();

        assert!(f.repo.create(evaluation).await.is_err());
    }

    #[tokio::test]
    async fn test_cascade_on_user_rename_and_delete() {
        let f = fixture().await;
        f.repo.create(new_evaluation(Utc::now())).await.unwrap();

        let users = SqliteUserRepository::new(f.pool.clone());
        let renamed = User::new("alicia", "Alice", UserType::User, "hash");
        users.update("alice", &renamed).await.unwrap();
        assert!(f.repo.latest("alicia", "sales").await.unwrap().is_some());

        users.delete("alicia").await.unwrap();
        assert!(f.repo.latest("alicia", "sales").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_history() {
        let f = fixture().await;
        sqlx::query(
            "INSERT INTO evaluations (user, chart, timestamp, chat_history) VALUES (?, ?, ?, ?)",
        )
        .bind("alice")
        .bind("sales")
        .bind(Utc::now())
        .bind(b"not json".to_vec())
        .execute(&f.pool)
        .await
        .unwrap();

        let err = f.repo.latest("alice", "sales").await.unwrap_err();
        assert_eq!(err.message(), "Failed to decode existing chat history");
    }

    #[tokio::test]
    async fn test_delete_all() {
        let f = fixture().await;
        f.repo.create(new_evaluation(Utc::now())).await.unwrap();
        f.repo.create(new_evaluation(Utc::now())).await.unwrap();

        assert_eq!(f.repo.delete_all().await.unwrap(), 2);
    }
}
