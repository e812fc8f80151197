//! Chart Evaluation API
//!
//! Users ask an LLM questions about chart images and keep one conversation
//! per chart. Administrators manage users and charts, and maintenance
//! endpoints replace them in bulk from CSV files.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{ChartRepository, EvaluationRepository, LlmProvider, RevokedTokenRepository, UserRepository};
use infrastructure::{
    auth::{JwtConfig, JwtService},
    chart::{ChartService, InMemoryChartRepository, SqliteChartRepository},
    evaluation::{EvaluationService, InMemoryEvaluationRepository, SqliteEvaluationRepository},
    llm::create_llm_provider,
    reset::ResetService,
    storage,
    token::{InMemoryRevokedTokenRepository, SqliteRevokedTokenRepository},
    user::{Argon2Hasher, InMemoryUserRepository, SqliteUserRepository, UserService},
};
use tracing::info;

/// Repositories backing one application instance
struct Repositories {
    users: Arc<dyn UserRepository>,
    charts: Arc<dyn ChartRepository>,
    evaluations: Arc<dyn EvaluationRepository>,
    revoked_tokens: Arc<dyn RevokedTokenRepository>,
}

/// Create the application state on SQLite.
///
/// With `in_memory` the database lives in a private `sqlite::memory:`
/// connection and is lost on shutdown.
pub async fn create_app_state(config: &AppConfig, in_memory: bool) -> anyhow::Result<AppState> {
    let pool = if in_memory {
        info!("Using in-memory SQLite database");
        storage::connect_in_memory().await?
    } else {
        info!("Connecting to SQLite database at {}", config.database.url);
        storage::connect(&config.database).await?
    };

    let version = storage::run_schema_migrations(&pool).await?;
    info!(version = ?version, "Database schema is up to date");

    let repositories = Repositories {
        users: Arc::new(SqliteUserRepository::new(pool.clone())),
        charts: Arc::new(SqliteChartRepository::new(pool.clone())),
        evaluations: Arc::new(SqliteEvaluationRepository::new(pool.clone())),
        revoked_tokens: Arc::new(SqliteRevokedTokenRepository::new(pool.clone())),
    };

    let llm = create_llm_provider(&config.llm)?;
    info!("LLM provider: {} ({})", llm.provider_name(), config.llm.model);

    Ok(assemble_state(config, repositories, llm).with_database(pool))
}

/// Create the application state on plain in-memory repositories with the
/// given chat completion provider. Used by integration tests.
pub fn create_in_memory_app_state(config: &AppConfig, llm: Arc<dyn LlmProvider>) -> AppState {
    let repositories = Repositories {
        users: Arc::new(InMemoryUserRepository::new()),
        charts: Arc::new(InMemoryChartRepository::new()),
        evaluations: Arc::new(InMemoryEvaluationRepository::new()),
        revoked_tokens: Arc::new(InMemoryRevokedTokenRepository::new()),
    };

    assemble_state(config, repositories, llm)
}

fn assemble_state(
    config: &AppConfig,
    repositories: Repositories,
    llm: Arc<dyn LlmProvider>,
) -> AppState {
    let hasher = Arc::new(Argon2Hasher::new());
    let jwt = JwtService::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiration_hours,
    ));

    let user_service = UserService::new(
        repositories.users.clone(),
        repositories.revoked_tokens,
        hasher.clone(),
        jwt,
    );
    let chart_service = ChartService::new(repositories.charts.clone());
    let evaluation_service =
        EvaluationService::new(repositories.evaluations, repositories.charts.clone(), llm);
    let reset_service = ResetService::new(
        repositories.users,
        repositories.charts,
        evaluation_service.clone(),
        hasher,
        config.auth.admin_password.clone(),
    );

    AppState::new(user_service, chart_service, evaluation_service, reset_service)
        .with_reset_key(config.auth.reset_key.clone())
}
