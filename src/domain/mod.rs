//! Domain layer - Core business entities, validation and repository traits

pub mod chart;
pub mod error;
pub mod evaluation;
pub mod llm;
pub mod token;
pub mod user;

pub use chart::{Chart, ChartRepository, ChartValidationError};
pub use error::DomainError;
pub use evaluation::{ChatHistory, Evaluation, EvaluationRepository, NewEvaluation};
pub use llm::{ChatMessage, ContentPart, ImageUrl, LlmProvider, MessageContent, MessageRole};
pub use token::{RevokedToken, RevokedTokenRepository};
pub use user::{User, UserRepository, UserType, UserValidationError};
