//! Maintenance endpoints replacing data in bulk

use axum::{
    extract::{Multipart, State},
    routing::post,
    Router,
};
use serde::Serialize;

use crate::api::middleware::ResetKey;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, MessageResponse};

/// Create the reset router
pub fn create_reset_router() -> Router<AppState> {
    Router::new()
        .route("/reset/users", post(reset_users))
        .route("/reset/charts", post(reset_charts))
        .route("/reset/evaluations", post(reset_evaluations))
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: String,
    pub imported: usize,
}

/// Bytes of the multipart field named `file`
async fn read_file(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
            return Ok(bytes.to_vec());
        }
    }

    Err(ApiError::unprocessable("Field 'file' is required"))
}

/// POST /reset/users
pub async fn reset_users(
    State(state): State<AppState>,
    _key: ResetKey,
    multipart: Multipart,
) -> Result<Json<ResetResponse>, ApiError> {
    let csv = read_file(multipart).await?;
    let imported = state.reset_service.reset_users(&csv).await?;

    Ok(Json(ResetResponse {
        message: "Users reset successfully".to_string(),
        imported,
    }))
}

/// POST /reset/charts
pub async fn reset_charts(
    State(state): State<AppState>,
    _key: ResetKey,
    multipart: Multipart,
) -> Result<Json<ResetResponse>, ApiError> {
    let csv = read_file(multipart).await?;
    let imported = state.reset_service.reset_charts(&csv).await?;

    Ok(Json(ResetResponse {
        message: "Charts reset successfully".to_string(),
        imported,
    }))
}

/// POST /reset/evaluations
pub async fn reset_evaluations(
    State(state): State<AppState>,
    _key: ResetKey,
) -> Result<Json<MessageResponse>, ApiError> {
    state.reset_service.reset_evaluations().await?;
    Ok(Json(MessageResponse::new("Evaluations reset successfully")))
}
