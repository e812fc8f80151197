use chrono::{DateTime, Utc};

/// An access token invalidated before its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokedToken {
    pub token: String,
    /// Expiry taken from the token itself; after it the entry can be purged
    pub expires_at: DateTime<Utc>,
}

impl RevokedToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
