//! Chart management service

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::domain::chart::{Chart, ChartRepository};
use crate::domain::DomainError;

/// Request for creating a chart
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChartRequest {
    pub name: String,
    pub description: String,
    pub instruction: String,
    pub url: String,
}

/// Partial update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateChartRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChartService {
    repository: Arc<dyn ChartRepository>,
}

impl ChartService {
    pub fn new(repository: Arc<dyn ChartRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateChartRequest) -> Result<Chart, DomainError> {
        let chart = Chart::new(
            request.name,
            request.description,
            request.instruction,
            request.url,
        )
        .map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.get(&chart.name).await?.is_some() {
            return Err(DomainError::conflict(
                "Chart with this filename already exists",
            ));
        }

        let chart = self.repository.create(chart).await?;
        info!(chart = %chart.name, "Created chart");

        Ok(chart)
    }

    pub async fn get(&self, name: &str) -> Result<Chart, DomainError> {
        self.repository
            .get(name)
            .await?
            .ok_or_else(|| DomainError::not_found("Chart not found"))
    }

    pub async fn list(&self) -> Result<Vec<Chart>, DomainError> {
        self.repository.list().await
    }

    pub async fn update(
        &self,
        name: &str,
        request: UpdateChartRequest,
    ) -> Result<Chart, DomainError> {
        let mut chart = self.get(name).await?;

        if let Some(new_name) = request.name {
            chart.name = new_name;
        }
        if let Some(description) = request.description {
            chart.description = description;
        }
        if let Some(instruction) = request.instruction {
            chart.instruction = instruction;
        }
        if let Some(url) = request.url {
            chart.url = url;
        }

        chart
            .validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let chart = self.repository.update(name, &chart).await?;
        info!(chart = %name, updated = %chart.name, "Updated chart");

        Ok(chart)
    }

    pub async fn delete(&self, name: &str) -> Result<(), DomainError> {
        if !self.repository.delete(name).await? {
            return Err(DomainError::not_found("Chart not found"));
        }

        info!(chart = %name, "Deleted chart");
        Ok(())
    }
}
