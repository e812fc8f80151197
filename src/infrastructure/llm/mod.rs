//! LLM provider implementations

mod http_client;
mod openai;

pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiProvider;

use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::config::LlmConfig;
use crate::domain::{DomainError, LlmProvider};

/// Build the configured chat completion provider
pub fn create_llm_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
    if config.api_key.as_deref().is_none_or(str::is_empty) {
        warn!("llm.api_key is not set; chat completions will be rejected by the provider");
    }

    let client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;
    Ok(Arc::new(OpenAiProvider::new(client, config)))
}
