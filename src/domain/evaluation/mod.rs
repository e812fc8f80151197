//! Evaluation domain
//!
//! An evaluation is the persisted conversation between one user and the LLM
//! about one chart.

mod entity;
mod history;
mod repository;

pub use entity::{Evaluation, NewEvaluation};
pub use history::ChatHistory;
pub use repository::EvaluationRepository;
