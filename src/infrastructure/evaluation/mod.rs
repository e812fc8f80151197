//! Evaluation infrastructure module
//!
//! Persisted conversations and the service that extends them with LLM replies.

mod repository;
mod service;
mod sqlite_repository;

pub use repository::InMemoryEvaluationRepository;
pub use service::EvaluationService;
pub use sqlite_repository::SqliteEvaluationRepository;
