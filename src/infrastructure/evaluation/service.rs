//! Evaluation service: ask questions about a chart and keep the conversation

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::chart::ChartRepository;
use crate::domain::evaluation::{ChatHistory, Evaluation, EvaluationRepository, NewEvaluation};
use crate::domain::llm::{ChatMessage, LlmProvider};
use crate::domain::DomainError;

type ConversationKey = (String, String);

#[derive(Debug, Clone)]
pub struct EvaluationService {
    evaluations: Arc<dyn EvaluationRepository>,
    charts: Arc<dyn ChartRepository>,
    llm: Arc<dyn LlmProvider>,
    /// One lock per (user, chart), held from loading the history until it is persisted
    conversations: Arc<Mutex<HashMap<ConversationKey, Arc<Mutex<()>>>>>,
}

impl EvaluationService {
    pub fn new(
        evaluations: Arc<dyn EvaluationRepository>,
        charts: Arc<dyn ChartRepository>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            evaluations,
            charts,
            llm,
            conversations: Arc::default(),
        }
    }

    /// Latest evaluation of `chart` by `user`
    pub async fn get(&self, user: &str, chart: &str) -> Result<Evaluation, DomainError> {
        self.evaluations
            .latest(user, chart)
            .await?
            .ok_or_else(|| DomainError::not_found("Evaluation not found"))
    }

    /// Ask a question, starting a new conversation or continuing the latest one
    pub async fn ask(
        &self,
        user: &str,
        chart: &str,
        question: &str,
    ) -> Result<Evaluation, DomainError> {
        if question.trim().is_empty() {
            return Err(DomainError::validation("Question must be provided"));
        }

        let key = (user.to_string(), chart.to_string());
        let lock = self.conversation_lock(&key).await;

        let result = {
            let _guard = lock.lock().await;
            self.ask_locked(user, chart, question).await
        };

        self.release_conversation_lock(&key, lock).await;
        result
    }

    async fn ask_locked(
        &self,
        user: &str,
        chart: &str,
        question: &str,
    ) -> Result<Evaluation, DomainError> {
        match self.evaluations.latest(user, chart).await? {
            Some(evaluation) => self.continue_evaluation(evaluation, question).await,
            None => self.start_evaluation(user, chart, question).await,
        }
    }

    async fn conversation_lock(&self, key: &ConversationKey) -> Arc<Mutex<()>> {
        self.conversations
            .lock()
            .await
            .entry(key.clone())
            .or_default()
            .clone()
    }

    /// Forget the lock once no other request holds or awaits it
    async fn release_conversation_lock(&self, key: &ConversationKey, lock: Arc<Mutex<()>>) {
        let mut conversations = self.conversations.lock().await;

        // the map and `lock` are the only remaining references
        if Arc::strong_count(&lock) <= 2 {
            conversations.remove(key);
        }
    }

    async fn start_evaluation(
        &self,
        user: &str,
        chart: &str,
        question: &str,
    ) -> Result<Evaluation, DomainError> {
        let chart = self
            .charts
            .get(chart)
            .await?
            .ok_or_else(|| DomainError::not_found("Chart not found"))?;

        let mut chat_history = ChatHistory::start(&chart.instruction, question, &chart.url);
        chat_history.push(self.complete(&chat_history).await?);

        let evaluation = self
            .evaluations
            .create(NewEvaluation {
                user: user.to_string(),
                chart: chart.name.clone(),
                timestamp: Utc::now(),
                chat_history,
            })
            .await?;

        info!(user = %user, chart = %chart.name, id = evaluation.id, "Started evaluation");
        Ok(evaluation)
    }

    async fn continue_evaluation(
        &self,
        evaluation: Evaluation,
        question: &str,
    ) -> Result<Evaluation, DomainError> {
        let mut chat_history = evaluation.chat_history;
        chat_history.push(ChatMessage::user_question(question));
        chat_history.push(self.complete(&chat_history).await?);

        let updated = self
            .evaluations
            .update_history(evaluation.id, &chat_history, Utc::now())
            .await?;

        info!(
            user = %updated.user,
            chart = %updated.chart,
            id = updated.id,
            messages = updated.chat_history.len(),
            "Continued evaluation"
        );
        Ok(updated)
    }

    async fn complete(&self, chat_history: &ChatHistory) -> Result<ChatMessage, DomainError> {
        self.llm
            .complete(chat_history.messages())
            .await
            .inspect_err(|e| {
                warn!(provider = self.llm.provider_name(), error = %e, "Completion failed")
            })
    }

    /// Delete every evaluation
    pub async fn reset(&self) -> Result<u64, DomainError> {
        let deleted = self.evaluations.delete_all().await?;
        info!(deleted, "Reset evaluations");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{MessageRole, MockLlmProvider};
    use crate::domain::Chart;
    use crate::infrastructure::chart::InMemoryChartRepository;
    use crate::infrastructure::evaluation::InMemoryEvaluationRepository;

    struct Fixture {
        service: EvaluationService,
        llm: Arc<MockLlmProvider>,
        evaluations: Arc<InMemoryEvaluationRepository>,
    }

    fn fixture(llm: MockLlmProvider) -> Fixture {
        let charts = InMemoryChartRepository::with_charts(vec![Chart::new(
            "sales",
            "Monthly sales",
            "You help students read charts",
            "https://example.com/sales.png",
        )
        .unwrap()]);
        let llm = Arc::new(llm);
        let evaluations = Arc::new(InMemoryEvaluationRepository::new());

        Fixture {
            service: EvaluationService::new(evaluations.clone(), Arc::new(charts), llm.clone()),
            llm,
            evaluations,
        }
    }

    #[tokio::test]
    async fn test_first_question_starts_conversation() {
        let f = fixture(MockLlmProvider::replying("It shows sales per month."));

        let evaluation = f.service.ask("alice", "sales", "What is this?").await.unwrap();
        let messages = evaluation.chat_history.messages();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], ChatMessage::system("You help students read charts"));
        assert_eq!(
            messages[1],
            ChatMessage::user_question_with_image("What is this?", "https://example.com/sales.png")
        );
        assert_eq!(messages[2], ChatMessage::assistant("It shows sales per month."));

        let requests = f.llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].len(), 2);
    }

    #[tokio::test]
    async fn test_follow_up_appends() {
        let f = fixture(MockLlmProvider::replying("Sure."));

        let first = f.service.ask("alice", "sales", "What is this?").await.unwrap();
        let second = f.service.ask("alice", "sales", "And in May?").await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.chat_history.len(), 5);
        assert_eq!(second.chat_history.messages()[3], ChatMessage::user_question("And in May?"));
        assert_eq!(second.chat_history.last_role(), Some(MessageRole::Assistant));
        assert!(second.timestamp >= first.timestamp);

        assert_eq!(f.llm.requests()[1].len(), 4);
        assert_eq!(f.service.get("alice", "sales").await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_blank_question() {
        let f = fixture(MockLlmProvider::replying("unused"));

        let err = f.service.ask("alice", "sales", "   ").await.unwrap_err();
        assert_eq!(err.message(), "Question must be provided");
        assert!(f.llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_chart() {
        let f = fixture(MockLlmProvider::replying("unused"));

        let err = f.service.ask("alice", "nope", "Hi").await.unwrap_err();
        assert_eq!(err.message(), "Chart not found");
    }

    #[tokio::test]
    async fn test_provider_failure_persists_nothing() {
        let f = fixture(MockLlmProvider::failing("HTTP 500"));

        let err = f.service.ask("alice", "sales", "What is this?").await.unwrap_err();
        assert!(matches!(err, DomainError::Provider { .. }));
        assert!(f.evaluations.latest("alice", "sales").await.unwrap().is_none());
    }

    /// Replies after a delay so that overlapping requests interleave
    #[derive(Debug)]
    struct SlowLlm;

    #[async_trait::async_trait]
    impl LlmProvider for SlowLlm {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatMessage, DomainError> {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok(ChatMessage::assistant(format!("reply to {} messages", messages.len())))
        }

        fn provider_name(&self) -> &'static str {
            "slow"
        }
    }

    fn slow_service() -> EvaluationService {
        let charts = InMemoryChartRepository::with_charts(vec![Chart::new(
            "sales",
            "Monthly sales",
            "You help students read charts",
            "https://example.com/sales.png",
        )
        .unwrap()]);

        EvaluationService::new(
            Arc::new(InMemoryEvaluationRepository::new()),
            Arc::new(charts),
            Arc::new(SlowLlm),
        )
    }

    #[tokio::test]
    async fn test_concurrent_follow_ups_keep_every_message() {
        let service = slow_service();
        service.ask("alice", "sales", "first").await.unwrap();

        let (a, b) = tokio::join!(
            service.ask("alice", "sales", "Q-A"),
            service.ask("alice", "sales", "Q-B"),
        );
        a.unwrap();
        b.unwrap();

        let latest = service.get("alice", "sales").await.unwrap();
        assert_eq!(latest.chat_history.len(), 7);

        let questions: Vec<String> = latest
            .chat_history
            .messages()
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.text())
            .collect();
        assert!(questions.contains(&"Q-A".to_string()));
        assert!(questions.contains(&"Q-B".to_string()));
        assert!(service.conversations.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_first_questions_share_one_evaluation() {
        let service = slow_service();

        let (a, b) = tokio::join!(
            service.ask("alice", "sales", "one"),
            service.ask("alice", "sales", "two"),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.id, b.id);
        assert_eq!(service.get("alice", "sales").await.unwrap().chat_history.len(), 5);
    }

    #[tokio::test]
    async fn test_other_conversations_are_not_blocked() {
        let service = slow_service();

        let (a, b) = tokio::join!(
            service.ask("alice", "sales", "mine"),
            service.ask("bob", "sales", "mine too"),
        );

        assert_ne!(a.unwrap().id, b.unwrap().id);
    }

    #[tokio::test]
    async fn test_get_missing_and_reset() {
        let f = fixture(MockLlmProvider::replying("ok"));

        let err = f.service.get("alice", "sales").await.unwrap_err();
        assert_eq!(err.message(), "Evaluation not found");

        f.service.ask("alice", "sales", "Q").await.unwrap();
        assert_eq!(f.service.reset().await.unwrap(), 1);
        assert!(f.service.get("alice", "sales").await.is_err());
    }
}
