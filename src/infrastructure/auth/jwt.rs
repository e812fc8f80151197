//! JWT access token generation and validation

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub username: String,
    /// Issued at timestamp (Unix epoch); 0 when the token carries none
    #[serde(default)]
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    /// Create claims for `username` valid for `expiration_hours` from `now`
    pub fn new(username: impl Into<String>, now: DateTime<Utc>, expiration_hours: u64) -> Self {
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            username: username.into(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Configuration for JWT service
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// HS256 token service
#[derive(Clone)]
pub struct JwtService {
    expiration_hours: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_hours", &self.expiration_hours)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            expiration_hours: config.expiration_hours,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Issue an access token for `username`
    pub fn generate(&self, username: &str) -> Result<String, DomainError> {
        let claims = JwtClaims::new(username, Utc::now(), self.expiration_hours);
        self.encode(&claims)
    }

    pub fn encode(&self, claims: &JwtClaims) -> Result<String, DomainError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate access token: {}", e)))
    }

    /// Check signature and expiry, returning the claims
    pub fn decode(&self, token: &str) -> Result<JwtClaims, DomainError> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    DomainError::unauthorized("Access token has expired")
                }
                _ => DomainError::unauthorized("Invalid access token"),
            })
    }

    pub fn expiration_hours(&self) -> u64 {
        self.expiration_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(JwtConfig::new("test-secret", 168))
    }

    #[test]
    fn test_generate_and_decode() {
        let service = service();
        let token = service.generate("alice@example.com").unwrap();

        let claims = service.decode(&token).unwrap();
        assert_eq!(claims.username, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, 168 * 3600);
    }

    #[test]
    fn test_expired_token() {
        let service = service();
        let claims = JwtClaims::new("alice", Utc::now() - Duration::hours(2), 1);
        let token = service.encode(&claims).unwrap();

        let err = service.decode(&token).unwrap_err();
        assert_eq!(err.message(), "Access token has expired");
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = service().generate("alice").unwrap();
        let other = JwtService::new(JwtConfig::new("other-secret", 168));

        let err = other.decode(&token).unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized { .. }));
        assert_eq!(err.message(), "Invalid access token");
    }

    #[test]
    fn test_token_without_iat_is_accepted() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "username": "alice", "exp": exp }),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let claims = service().decode(&token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iat, 0);
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let err = service().decode("not-a-jwt").unwrap_err();
        assert_eq!(err.message(), "Invalid access token");
    }

    #[test]
    fn test_expires_at() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let claims = JwtClaims::new("alice", now, 24);

        assert_eq!(claims.expires_at(), now + Duration::hours(24));
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", JwtConfig::new("test-secret", 1));
        assert!(!debug.contains("test-secret"));
    }
}
