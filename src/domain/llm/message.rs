use serde::{Deserialize, Serialize};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Image reference attached to a user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Content part for multimodal messages, in the chat completions wire format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Message content: either plain text or a list of parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: MessageContent) -> Self {
        Self { role, content }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, MessageContent::Text(content.into()))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, MessageContent::Text(content.into()))
    }

    /// User question as a single text part
    pub fn user_question(question: impl Into<String>) -> Self {
        Self::new(
            MessageRole::User,
            MessageContent::Parts(vec![ContentPart::Text {
                text: question.into(),
            }]),
        )
    }

    /// User question followed by the image it refers to
    pub fn user_question_with_image(question: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(
            MessageRole::User,
            MessageContent::Parts(vec![
                ContentPart::Text {
                    text: question.into(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: url.into() },
                },
            ]),
        )
    }

    /// Concatenated text of the message, ignoring image parts
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_question_with_image_wire_format() {
        let message = ChatMessage::user_question_with_image("What is shown?", "https://x/c.png");
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "role": "user",
                "content": [
                    { "type": "text", "text": "What is shown?" },
                    { "type": "image_url", "image_url": { "url": "https://x/c.png" } }
                ]
            })
        );
    }

    #[test]
    fn test_plain_text_content() {
        let json = serde_json::to_value(ChatMessage::system("Be brief")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "system", "content": "Be brief" }));
    }

    #[test]
    fn test_deserialize_both_content_shapes() {
        let messages: Vec<ChatMessage> = serde_json::from_str(
            r#"[
                {"role": "assistant", "content": "An upward trend."},
                {"role": "user", "content": [{"type": "text", "text": "Why?"}]}
            ]"#,
        )
        .unwrap();

        assert_eq!(messages[0], ChatMessage::assistant("An upward trend."));
        assert_eq!(messages[1], ChatMessage::user_question("Why?"));
    }

    #[test]
    fn test_text_skips_images() {
        let message = ChatMessage::user_question_with_image("Explain", "https://x/c.png");
        assert_eq!(message.text(), "Explain");
    }
}
