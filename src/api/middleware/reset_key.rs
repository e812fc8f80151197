//! Shared maintenance key guarding the reset endpoints

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::warn;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::DomainError;

/// Passes when the raw `Authorization` header equals the configured reset key
#[derive(Debug, Clone, Copy)]
pub struct ResetKey;

impl FromRequestParts<AppState> for ResetKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match (state.reset_key.as_deref(), provided) {
            (Some(expected), Some(provided)) if keys_match(expected, provided) => Ok(ResetKey),
            (None, _) => {
                warn!("Reset requested but no reset key is configured");
                Err(DomainError::forbidden("Invalid secret key").into())
            }
            _ => Err(DomainError::forbidden("Invalid secret key").into()),
        }
    }
}

/// Constant-time comparison for keys of equal length
fn keys_match(expected: &str, provided: &str) -> bool {
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();

    if expected.len() != provided.len() {
        return false;
    }

    expected
        .iter()
        .zip(provided)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match() {
        assert!(keys_match("s3cret", "s3cret"));
        assert!(!keys_match("s3cret", "s3creT"));
        assert!(!keys_match("s3cret", "s3cre"));
        assert!(!keys_match("s3cret", ""));
    }
}
