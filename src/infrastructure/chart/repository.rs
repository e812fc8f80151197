//! In-memory chart repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::chart::{Chart, ChartRepository};
use crate::domain::DomainError;

/// In-memory implementation of ChartRepository, keyed by name
#[derive(Debug, Default)]
pub struct InMemoryChartRepository {
    charts: RwLock<BTreeMap<String, Chart>>,
}

impl InMemoryChartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_charts(charts: Vec<Chart>) -> Self {
        Self {
            charts: RwLock::new(charts.into_iter().map(|c| (c.name.clone(), c)).collect()),
        }
    }
}

#[async_trait]
impl ChartRepository for InMemoryChartRepository {
    async fn get(&self, name: &str) -> Result<Option<Chart>, DomainError> {
        Ok(self.charts.read().await.get(name).cloned())
    }

    async fn create(&self, chart: Chart) -> Result<Chart, DomainError> {
        let mut charts = self.charts.write().await;

        if charts.contains_key(&chart.name) {
            return Err(DomainError::conflict(
                "Chart with this filename already exists",
            ));
        }

        charts.insert(chart.name.clone(), chart.clone());
        Ok(chart)
    }

    async fn update(&self, name: &str, chart: &Chart) -> Result<Chart, DomainError> {
        let mut charts = self.charts.write().await;

        if !charts.contains_key(name) {
            return Err(DomainError::not_found("Chart not found"));
        }

        if chart.name != name && charts.contains_key(&chart.name) {
            return Err(DomainError::conflict(
                "Chart with this filename already exists",
            ));
        }

        charts.remove(name);
        charts.insert(chart.name.clone(), chart.clone());
        Ok(chart.clone())
    }

    async fn delete(&self, name: &str) -> Result<bool, DomainError> {
        Ok(self.charts.write().await.remove(name).is_some())
    }

    async fn list(&self) -> Result<Vec<Chart>, DomainError> {
        Ok(self.charts.read().await.values().cloned().collect())
    }

    async fn replace_all(&self, charts: Vec<Chart>) -> Result<usize, DomainError> {
        let mut replacement = BTreeMap::new();

        for chart in charts {
            let name = chart.name.clone();
            if replacement.insert(name.clone(), chart).is_some() {
                return Err(DomainError::conflict(format!("Duplicate chart '{}'", name)));
            }
        }

        let count = replacement.len();
        *self.charts.write().await = replacement;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(name: &str) -> Chart {
        Chart::new(name, "desc", "Describe the chart", "https://example.com/c.png").unwrap()
    }

    #[tokio::test]
    async fn test_crud() {
        let repo = InMemoryChartRepository::new();
        repo.create(chart("b-chart")).await.unwrap();
        repo.create(chart("a-chart")).await.unwrap();

        assert!(repo.create(chart("a-chart")).await.is_err());

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["a-chart", "b-chart"]);

        assert!(repo.delete("a-chart").await.unwrap());
        assert!(repo.get("a-chart").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing() {
        let repo = InMemoryChartRepository::new();
        let err = repo.update("nope", &chart("nope")).await.unwrap_err();
        assert_eq!(err.message(), "Chart not found");
    }
}
