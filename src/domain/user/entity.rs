//! User entity and related types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::validation::UserValidationError;

/// Kind of account; admins manage users and charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    #[default]
    User,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl FromStr for UserType {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(UserValidationError::UnknownUserType(s.to_string())),
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Login name, unique
    username: String,
    full_name: String,
    disabled: bool,
    #[serde(rename = "type")]
    user_type: UserType,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
}

impl User {
    /// Create a new, enabled user
    pub fn new(
        username: impl Into<String>,
        full_name: impl Into<String>,
        user_type: UserType,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            full_name: full_name.into(),
            disabled: false,
            user_type,
            password_hash: password_hash.into(),
        }
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    // Getters

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    // Mutators

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_full_name(&mut self, full_name: impl Into<String>) {
        self.full_name = full_name.into();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_user_type(&mut self, user_type: UserType) {
        self.user_type = user_type;
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
    }
}
