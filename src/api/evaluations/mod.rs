//! Evaluation endpoints: read and extend a user's conversation about a chart

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::evaluation::Evaluation;

/// Create the evaluations router
pub fn create_evaluations_router() -> Router<AppState> {
    Router::new().route(
        "/evaluations/{user}/{chart}",
        get(get_evaluation).post(ask_question),
    )
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

/// Evaluation as sent to clients; `chat_history` is the JSON-encoded message list
#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub id: i64,
    pub user: String,
    pub chart: String,
    pub timestamp: DateTime<Utc>,
    pub chat_history: String,
}

impl TryFrom<Evaluation> for EvaluationResponse {
    type Error = ApiError;

    fn try_from(evaluation: Evaluation) -> Result<Self, Self::Error> {
        Ok(Self {
            chat_history: evaluation.chat_history.to_json()?,
            id: evaluation.id,
            user: evaluation.user,
            chart: evaluation.chart,
            timestamp: evaluation.timestamp,
        })
    }
}

fn ensure_owner(auth: &RequireUser, user: &str) -> Result<(), ApiError> {
    let me = auth.user.username();

    if me != user {
        return Err(ApiError::unauthorized(format!(
            "'{}' is not authorized to access evaluation for '{}'",
            me, user
        )));
    }

    Ok(())
}

/// GET /evaluations/{user}/{chart}
pub async fn get_evaluation(
    State(state): State<AppState>,
    Path((user, chart)): Path<(String, String)>,
    auth: RequireUser,
) -> Result<Json<EvaluationResponse>, ApiError> {
    ensure_owner(&auth, &user)?;

    let evaluation = state.evaluation_service.get(&user, &chart).await?;
    Ok(Json(evaluation.try_into()?))
}

/// POST /evaluations/{user}/{chart}
pub async fn ask_question(
    State(state): State<AppState>,
    Path((user, chart)): Path<(String, String)>,
    auth: RequireUser,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    ensure_owner(&auth, &user)?;

    let evaluation = state
        .evaluation_service
        .ask(&user, &chart, &request.question)
        .await?;
    Ok(Json(evaluation.try_into()?))
}
