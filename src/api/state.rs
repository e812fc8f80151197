//! Application state for shared services

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::infrastructure::chart::ChartService;
use crate::infrastructure::evaluation::EvaluationService;
use crate::infrastructure::reset::ResetService;
use crate::infrastructure::user::UserService;

/// Services shared by every handler; cloning is cheap
#[derive(Clone, Debug)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub chart_service: Arc<ChartService>,
    pub evaluation_service: Arc<EvaluationService>,
    pub reset_service: Arc<ResetService>,
    /// Shared maintenance key for `/reset`; `None` rejects every reset
    pub reset_key: Option<Arc<str>>,
    /// Pinged by the readiness check; `None` when running on in-memory repositories
    pub database: Option<SqlitePool>,
}

impl AppState {
    pub fn new(
        user_service: UserService,
        chart_service: ChartService,
        evaluation_service: EvaluationService,
        reset_service: ResetService,
    ) -> Self {
        Self {
            user_service: Arc::new(user_service),
            chart_service: Arc::new(chart_service),
            evaluation_service: Arc::new(evaluation_service),
            reset_service: Arc::new(reset_service),
            reset_key: None,
            database: None,
        }
    }

    pub fn with_reset_key(mut self, reset_key: Option<String>) -> Self {
        self.reset_key = reset_key.filter(|k| !k.is_empty()).map(Arc::from);
        self
    }

    pub fn with_database(mut self, pool: SqlitePool) -> Self {
        self.database = Some(pool);
        self
    }
}
