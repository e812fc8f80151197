//! SQLite chart repository implementation

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::domain::chart::{Chart, ChartRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

const DUPLICATE_CHART: &str = "Chart with this filename already exists";

/// SQLite implementation of ChartRepository
#[derive(Debug, Clone)]
pub struct SqliteChartRepository {
    pool: SqlitePool,
}

impl SqliteChartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChartRepository for SqliteChartRepository {
    async fn get(&self, name: &str) -> Result<Option<Chart>, DomainError> {
        let row = sqlx::query(
            "SELECT name, description, instruction, url FROM charts WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get chart: {}", e)))?;

        row.as_ref().map(row_to_chart).transpose()
    }

    async fn create(&self, chart: Chart) -> Result<Chart, DomainError> {
        sqlx::query(
            "INSERT INTO charts (name, description, instruction, url) VALUES (?, ?, ?, ?)",
        )
        .bind(&chart.name)
        .bind(&chart.description)
        .bind(&chart.instruction)
        .bind(&chart.url)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(DUPLICATE_CHART)
            } else {
                DomainError::storage(format!("Failed to create chart: {}", e))
            }
        })?;

        Ok(chart)
    }

    async fn update(&self, name: &str, chart: &Chart) -> Result<Chart, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE charts
            SET name = ?, description = ?, instruction = ?, url = ?
            WHERE name = ?
            "#,
        )
        .bind(&chart.name)
        .bind(&chart.description)
        .bind(&chart.instruction)
        .bind(&chart.url)
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(DUPLICATE_CHART)
            } else {
                DomainError::storage(format!("Failed to update chart: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Chart not found"));
        }

        Ok(chart.clone())
    }

    async fn delete(&self, name: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM charts WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete chart: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Chart>, DomainError> {
        let rows =
            sqlx::query("SELECT name, description, instruction, url FROM charts ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to list charts: {}", e)))?;

        rows.iter().map(row_to_chart).collect()
    }

    async fn replace_all(&self, charts: Vec<Chart>) -> Result<usize, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("DELETE FROM charts")
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete charts: {}", e)))?;

        for chart in &charts {
            sqlx::query(
                "INSERT INTO charts (name, description, instruction, url) VALUES (?, ?, ?, ?)",
            )
            .bind(&chart.name)
            .bind(&chart.description)
            .bind(&chart.instruction)
            .bind(&chart.url)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::conflict(format!("Duplicate chart '{}'", chart.name))
                } else {
                    DomainError::storage(format!("Failed to insert chart: {}", e))
                }
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit charts: {}", e)))?;

        Ok(charts.len())
    }
}

fn row_to_chart(row: &SqliteRow) -> Result<Chart, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode chart: {}", e));

    Ok(Chart {
        name: row.try_get("name").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        instruction: row.try_get("instruction").map_err(decode)?,
        url: row.try_get("url").map_err(decode)?,
    })
}
