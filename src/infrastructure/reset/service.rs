//! Replace users, charts or evaluations in bulk

use std::sync::Arc;
use tracing::{info, warn};

use super::csv_import::{parse_charts, parse_users};
use crate::domain::chart::ChartRepository;
use crate::domain::user::{User, UserRepository, UserType};
use crate::domain::DomainError;
use crate::infrastructure::evaluation::EvaluationService;
use crate::infrastructure::user::{random_password, PasswordHasher};

/// Built-in account recreated by every user reset
pub const ADMIN_USERNAME: &str = "admin";

#[derive(Debug, Clone)]
pub struct ResetService {
    users: Arc<dyn UserRepository>,
    charts: Arc<dyn ChartRepository>,
    evaluations: EvaluationService,
    hasher: Arc<dyn PasswordHasher>,
    admin_password: Option<String>,
}

impl ResetService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        charts: Arc<dyn ChartRepository>,
        evaluations: EvaluationService,
        hasher: Arc<dyn PasswordHasher>,
        admin_password: Option<String>,
    ) -> Self {
        Self {
            users,
            charts,
            evaluations,
            hasher,
            admin_password,
        }
    }

    /// Replace every user with the built-in admin plus the rows of `csv`.
    /// Returns the number of imported rows.
    pub async fn reset_users(&self, csv: &[u8]) -> Result<usize, DomainError> {
        let records = parse_users(csv, &[ADMIN_USERNAME])?;
        let mut users = Vec::with_capacity(records.len() + 1);
        users.push(self.admin_user()?);

        for record in records {
            let password_hash = self.hasher.hash(&record.password)?;
            users.push(
                User::new(record.username, record.full_name, record.user_type, password_hash)
                    .with_disabled(record.disabled),
            );
        }

        let imported = self.users.replace_all(users).await? - 1;
        info!(imported, "Reset users");

        Ok(imported)
    }

    /// Replace every chart with the rows of `csv`
    pub async fn reset_charts(&self, csv: &[u8]) -> Result<usize, DomainError> {
        let charts = parse_charts(csv)?;
        let imported = self.charts.replace_all(charts).await?;
        info!(imported, "Reset charts");

        Ok(imported)
    }

    pub async fn reset_evaluations(&self) -> Result<u64, DomainError> {
        self.evaluations.reset().await
    }

    fn admin_user(&self) -> Result<User, DomainError> {
        let admin = match self.admin_password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => User::new(
                ADMIN_USERNAME,
                "Administrator",
                UserType::Admin,
                self.hasher.hash(password)?,
            ),
            None => {
                warn!("No admin password configured; the built-in admin is disabled");
                User::new(
                    ADMIN_USERNAME,
                    "Administrator",
                    UserType::Admin,
                    self.hasher.hash(&random_password())?,
                )
                .with_disabled(true)
            }
        };

        Ok(admin)
    }
}
