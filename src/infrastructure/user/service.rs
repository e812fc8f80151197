//! User service for authentication and user management

use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::token::{RevokedToken, RevokedTokenRepository};
use crate::domain::user::{validate_password, validate_username, User, UserRepository, UserType};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtService;

use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub full_name: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(rename = "type")]
    pub user_type: String,
    pub password: String,
}

/// Partial update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub disabled: Option<bool>,
    #[serde(rename = "type")]
    pub user_type: Option<String>,
    pub password: Option<String>,
}

/// User service for authentication and management
#[derive(Debug, Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    revoked_tokens: Arc<dyn RevokedTokenRepository>,
    hasher: Arc<dyn PasswordHasher>,
    jwt: JwtService,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        revoked_tokens: Arc<dyn RevokedTokenRepository>,
        hasher: Arc<dyn PasswordHasher>,
        jwt: JwtService,
    ) -> Self {
        Self {
            repository,
            revoked_tokens,
            hasher,
            jwt,
        }
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_username(&request.username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;
        let user_type = parse_user_type(&request.user_type)?;

        if self.repository.exists(&request.username).await? {
            return Err(DomainError::conflict(
                "User with this username already exists",
            ));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(&request.username, &request.full_name, user_type, password_hash)
            .with_disabled(request.disabled);

        let user = self.repository.create(user).await?;
        info!(username = %user.username(), user_type = %user.user_type(), "Created user");

        Ok(user)
    }

    pub async fn get(&self, username: &str) -> Result<User, DomainError> {
        self.repository
            .get(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    pub async fn update(
        &self,
        username: &str,
        request: UpdateUserRequest,
    ) -> Result<User, DomainError> {
        let mut user = self.get(username).await?;

        if let Some(new_username) = request.username {
            validate_username(&new_username)
                .map_err(|e| DomainError::validation(e.to_string()))?;

            if new_username != username && self.repository.exists(&new_username).await? {
                return Err(DomainError::conflict(
                    "User with this username already exists",
                ));
            }

            user.set_username(new_username);
        }

        if let Some(full_name) = request.full_name {
            user.set_full_name(full_name);
        }

        if let Some(disabled) = request.disabled {
            user.set_disabled(disabled);
        }

        if let Some(user_type) = request.user_type {
            user.set_user_type(parse_user_type(&user_type)?);
        }

        if let Some(password) = request.password {
            validate_password(&password).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_password_hash(self.hasher.hash(&password)?);
        }

        let user = self.repository.update(username, &user).await?;
        info!(username = %username, updated = %user.username(), "Updated user");

        Ok(user)
    }

    pub async fn delete(&self, username: &str) -> Result<(), DomainError> {
        if !self.repository.delete(username).await? {
            return Err(DomainError::not_found("User not found"));
        }

        info!(username = %username, "Deleted user");
        Ok(())
    }

    /// Check credentials and issue an access token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, DomainError> {
        let user = self.get(username).await?;

        if !self.hasher.verify(password, user.password_hash()) {
            debug!(username = %username, "Rejected login with incorrect password");
            return Err(DomainError::unauthorized("Incorrect password"));
        }

        if user.is_disabled() {
            return Err(DomainError::unauthorized("User is disabled"));
        }

        self.jwt.generate(user.username())
    }

    /// Resolve an access token to an active user
    pub async fn verify_token(&self, token: &str) -> Result<User, DomainError> {
        let claims = self.jwt.decode(token)?;
        let user = self.get(&claims.username).await?;

        if user.is_disabled() {
            return Err(DomainError::unauthorized("User is disabled"));
        }

        if self.revoked_tokens.is_revoked(token).await? {
            return Err(DomainError::unauthorized("Access token has been revoked"));
        }

        Ok(user)
    }

    pub async fn verify_admin(&self, token: &str) -> Result<User, DomainError> {
        let user = self.verify_token(token).await?;

        if !user.is_admin() {
            return Err(DomainError::unauthorized("User is not admin"));
        }

        Ok(user)
    }

    /// Allow the account owner, or an admin for any other account
    pub async fn verify_self_or_admin(
        &self,
        token: &str,
        username: &str,
    ) -> Result<User, DomainError> {
        let claims = self.jwt.decode(token)?;

        if claims.username == username {
            self.verify_token(token).await
        } else {
            self.verify_admin(token).await
        }
    }

    /// Invalidate a token before its expiry
    pub async fn revoke_token(&self, token: &str) -> Result<&'static str, DomainError> {
        let claims = self.jwt.decode(token)?;
        self.get(&claims.username).await?;

        if self.revoked_tokens.is_revoked(token).await? {
            return Err(DomainError::validation("Token is already revoked"));
        }

        self.revoked_tokens
            .insert(RevokedToken::new(token, claims.expires_at()))
            .await?;

        let purged = self.revoked_tokens.purge_expired(Utc::now()).await?;
        info!(username = %claims.username, purged, "Revoked access token");

        Ok("Access token revoked successfully")
    }
}

fn parse_user_type(value: &str) -> Result<UserType, DomainError> {
    value
        .parse()
        .map_err(|e: crate::domain::UserValidationError| DomainError::validation(e.to_string()))
}
