//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("Username contains invalid character: {0:?}")]
    InvalidUsernameCharacter(char),

    #[error("Username '{0}' is reserved")]
    ReservedUsername(String),

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),

    #[error("Unknown user type '{0}'. Expected 'admin' or 'user'")]
    UnknownUserType(String),
}

const MAX_USERNAME_LENGTH: usize = 254;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Segments taken by static routes under `/users/`
const RESERVED_USERNAMES: [&str; 3] = ["login", "verify", "revoke"];

/// Validate a username
///
/// Usernames are often e-mail addresses, so anything printable is accepted
/// except whitespace and `/`, which would break the `/users/{username}` path.
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    if let Some(c) = username
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || *c == '/')
    {
        return Err(UserValidationError::InvalidUsernameCharacter(c));
    }

    if RESERVED_USERNAMES.contains(&username) {
        return Err(UserValidationError::ReservedUsername(username.to_string()));
    }

    Ok(())
}

/// Validate a plain text password before hashing
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }

    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}
