//! User management and authentication endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{BearerToken, RequireAdmin};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Form, Json, MessageResponse};
use crate::domain::user::User;
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

/// Create the users router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/", post(create_user))
        .route("/users/login", post(login))
        .route("/users/verify", post(verify_token))
        .route("/users/revoke", post(revoke_token))
        .route(
            "/users/{username}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state.user_service.create(request).await?;
    Ok(Json(user))
}

/// GET /users/{username}, for the account owner or an admin
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    BearerToken(token): BearerToken,
) -> Result<Json<User>, ApiError> {
    state
        .user_service
        .verify_self_or_admin(&token, &username)
        .await?;

    let user = state.user_service.get(&username).await?;
    Ok(Json(user))
}

/// PUT /users/{username}
pub async fn update_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    RequireAdmin(_admin): RequireAdmin,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state.user_service.update(&username, request).await?;
    Ok(Json(user))
}

/// DELETE /users/{username}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /users/login with a url-encoded form
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResponse>, ApiError> {
    let access_token = state
        .user_service
        .login(&form.username, &form.password)
        .await?;

    Ok(Json(LoginResponse { access_token }))
}

/// POST /users/verify
pub async fn verify_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state.user_service.verify_token(&request.token).await?;
    Ok(Json(user))
}

/// POST /users/revoke
pub async fn revoke_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.user_service.revoke_token(&request.token).await?;
    Ok(Json(MessageResponse::new(message)))
}
