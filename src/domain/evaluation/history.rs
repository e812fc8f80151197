use serde::{Deserialize, Serialize};

use crate::domain::llm::{ChatMessage, MessageRole};
use crate::domain::DomainError;

/// Ordered conversation, stored as UTF-8 JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHistory(Vec<ChatMessage>);

impl ChatHistory {
    /// Start a conversation: system instruction, then the first question with the chart image
    pub fn start(instruction: &str, question: &str, image_url: &str) -> Self {
        Self(vec![
            ChatMessage::system(instruction),
            ChatMessage::user_question_with_image(question, image_url),
        ])
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.0.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Role of the last message, if any
    pub fn last_role(&self) -> Option<MessageRole> {
        self.0.last().map(|m| m.role)
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string(&self.0)
            .map_err(|e| DomainError::internal(format!("Failed to encode chat history: {}", e)))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DomainError> {
        self.to_json().map(String::into_bytes)
    }

    /// Decode a stored history; a conversation always holds at least its instruction
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        let history: Self = serde_json::from_slice(bytes)
            .map_err(|_| DomainError::internal("Failed to decode existing chat history"))?;

        if history.is_empty() {
            return Err(DomainError::internal("Failed to decode existing chat history"));
        }

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_layout() {
        let history = ChatHistory::start("You explain charts", "What trend?", "https://x/a.png");

        assert_eq!(history.len(), 2);
        assert_eq!(history.messages()[0].role, MessageRole::System);
        assert_eq!(history.messages()[1].text(), "What trend?");
        assert_eq!(history.last_role(), Some(MessageRole::User));
    }

    #[test]
    fn test_bytes_round_trip_keeps_order() {
        let mut history = ChatHistory::start("i", "q1", "https://x/a.png");
        history.push(ChatMessage::assistant("a1"));
        history.push(ChatMessage::user_question("q2"));

        let decoded = ChatHistory::from_bytes(&history.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, history);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let err = ChatHistory::from_bytes(b"not json").unwrap_err();
        assert_eq!(err.message(), "Failed to decode existing chat history");
    }

    #[test]
    fn test_from_bytes_rejects_empty_conversation() {
        let err = ChatHistory::from_bytes(b"[]").unwrap_err();
        assert!(matches!(err, DomainError::Internal { .. }));
    }
}
