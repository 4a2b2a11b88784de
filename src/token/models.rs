use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the token_blacklist table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BlacklistedTokenModel {
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

impl BlacklistedTokenModel {
    /// Builds an entry from a token's jti and its `exp` claim
    pub fn new(jti: String, exp: usize) -> Self {
        let expires_at = DateTime::from_timestamp(exp as i64, 0).unwrap_or_else(Utc::now);
        Self { jti, expires_at }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
