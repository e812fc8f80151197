//! Bearer token extractors

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;

/// Raw access token from `Authorization: Bearer <token>`, not yet verified
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_bearer_token(&parts.headers).map(BearerToken)
    }
}

/// Extractor that requires a valid, unrevoked token of an enabled user
#[derive(Debug, Clone)]
pub struct RequireUser {
    pub user: User,
    pub token: String,
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let user = state.user_service.verify_token(&token).await?;

        debug!(username = %user.username(), "Authenticated request");
        Ok(RequireUser { user, token })
    }
}

/// Extractor that additionally requires an admin account
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let user = state.user_service.verify_admin(&token).await?;

        debug!(username = %user.username(), "Admin access");
        Ok(RequireAdmin(user))
    }
}

/// Token after the `Bearer ` scheme, up to the next space
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|rest| rest.split(' ').next())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::unauthorized("Invalid token format"))
}
