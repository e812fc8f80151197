//! Chart endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};

use crate::api::middleware::{RequireAdmin, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::chart::Chart;
use crate::infrastructure::chart::{CreateChartRequest, UpdateChartRequest};

/// Create the charts router
pub fn create_charts_router() -> Router<AppState> {
    Router::new()
        .route("/charts", get(list_charts).post(create_chart))
        .route("/charts/", get(list_charts).post(create_chart))
        .route(
            "/charts/{name}",
            get(get_chart).put(update_chart).delete(delete_chart),
        )
}

pub async fn list_charts(
    State(state): State<AppState>,
    _user: RequireUser,
) -> Result<Json<Vec<Chart>>, ApiError> {
    Ok(Json(state.chart_service.list().await?))
}

pub async fn create_chart(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(request): Json<CreateChartRequest>,
) -> Result<Json<Chart>, ApiError> {
    Ok(Json(state.chart_service.create(request).await?))
}

pub async fn get_chart(
    State(state): State<AppState>,
    Path(name): Path<String>,
    _user: RequireUser,
) -> Result<Json<Chart>, ApiError> {
    Ok(Json(state.chart_service.get(&name).await?))
}

pub async fn update_chart(
    State(state): State<AppState>,
    Path(name): Path<String>,
    RequireAdmin(_admin): RequireAdmin,
    Json(request): Json<UpdateChartRequest>,
) -> Result<Json<Chart>, ApiError> {
    Ok(Json(state.chart_service.update(&name, request).await?))
}

pub async fn delete_chart(
    State(state): State<AppState>,
    Path(name): Path<String>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<StatusCode, ApiError> {
    state.chart_service.delete(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}
