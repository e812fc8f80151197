use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::Chart;
use crate::domain::DomainError;

/// Repository trait for chart storage
#[async_trait]
pub trait ChartRepository: Send + Sync + Debug {
    async fn get(&self, name: &str) -> Result<Option<Chart>, DomainError>;

    /// Create a chart; fails with `Conflict` if the name is taken
    async fn create(&self, chart: Chart) -> Result<Chart, DomainError>;

    /// Replace the chart stored under `name`, which may rename it
    async fn update(&self, name: &str, chart: &Chart) -> Result<Chart, DomainError>;

    async fn delete(&self, name: &str) -> Result<bool, DomainError>;

    /// List all charts ordered by name
    async fn list(&self) -> Result<Vec<Chart>, DomainError>;

    /// Atomically delete every chart and insert `charts`
    async fn replace_all(&self, charts: Vec<Chart>) -> Result<usize, DomainError>;
}
