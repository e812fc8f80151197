//! Chart domain
//!
//! A chart is an image that users ask questions about, together with the
//! system instruction that frames the conversation.

mod entity;
mod repository;
mod validation;

pub use entity::Chart;
pub use repository::ChartRepository;
pub use validation::{validate_chart_name, ChartValidationError};
