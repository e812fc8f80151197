//! Chat completion domain types

mod message;
mod provider;

pub use message::{ChatMessage, ContentPart, ImageUrl, MessageContent, MessageRole};
pub use provider::LlmProvider;

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
