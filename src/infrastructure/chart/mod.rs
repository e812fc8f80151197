//! Chart infrastructure module

mod repository;
mod service;
mod sqlite_repository;

pub use repository::InMemoryChartRepository;
pub use service::{ChartService, CreateChartRequest, UpdateChartRequest};
pub use sqlite_repository::SqliteChartRepository;
