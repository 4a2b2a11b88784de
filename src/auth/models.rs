use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::AppError;

/// Accepted range of bcrypt work factors
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Database model for the users table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserModel {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserModel {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Checks a plain text password against the stored bcrypt hash
    pub fn verify_password(&self, password: &str) -> Result<bool, AppError> {
        bcrypt::verify(password, &self.password_hash)
            .map_err(|e| AppError::Internal(format!("password verification failed: {}", e)))
    }
}

/// Hashes a password with a random salt at the given bcrypt cost
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}
