use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::config::LlmConfig;
use crate::domain::{ChatMessage, DomainError, LlmProvider, MessageContent, MessageRole};

const PROVIDER: &str = "openai";

/// OpenAI chat completions provider
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
    max_completion_tokens: u32,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, config: &LlmConfig) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", config.api_key.as_deref().unwrap_or_default()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_completion_tokens: config.max_completion_tokens,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, messages: &[ChatMessage]) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_completion_tokens": self.max_completion_tokens,
        })
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<ChatMessage, DomainError> {
        let response: OpenAiResponse = serde_json::from_value(json)
            .map_err(|e| DomainError::provider(PROVIDER, format!("Invalid response: {}", e)))?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| DomainError::provider(PROVIDER, "Response contained no choices"))?;

        let content = message
            .content
            .ok_or_else(|| DomainError::provider(PROVIDER, "Response message has no content"))?;

        Ok(ChatMessage::new(message.role, content))
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatMessage, DomainError> {
        debug!(model = %self.model, messages = messages.len(), "Requesting chat completion");

        let body = self.build_request(messages);
        let json = self
            .client
            .post_json(&self.chat_completions_url(), self.headers(), &body)
            .await
            .map_err(|e| DomainError::provider(PROVIDER, e.message()))?;

        self.parse_response(json)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    role: MessageRole,
    content: Option<MessageContent>,
}
