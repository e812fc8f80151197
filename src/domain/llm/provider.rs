use async_trait::async_trait;
use std::fmt::Debug;

use super::ChatMessage;
use crate::domain::DomainError;

/// Trait for chat completion providers
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send the conversation and return the assistant's reply
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatMessage, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
