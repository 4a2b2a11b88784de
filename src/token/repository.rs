use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::BlacklistedTokenModel;
use crate::shared::AppError;

/// Trait for revoked refresh token storage
#[async_trait]
pub trait BlacklistRepository {
    /// Records a revoked token. Returns false if the jti was already present.
    async fn add(&self, entry: &BlacklistedTokenModel) -> Result<bool, AppError>;
    async fn contains(&self, jti: &str) -> Result<bool, AppError>;
    /// Deletes entries that expired before `now`, returning how many were removed
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}

/// In-memory implementation of BlacklistRepository for development and testing
pub struct InMemoryBlacklistRepository {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl Default for InMemoryBlacklistRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBlacklistRepository {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, DateTime<Utc>>>, AppError> {
        self.entries
            .lock()
            .map_err(|_| AppError::DatabaseError("blacklist store poisoned".to_string()))
    }
}

#[async_trait]
impl BlacklistRepository for InMemoryBlacklistRepository {
    #[instrument(skip(self, entry))]
    async fn add(&self, entry: &BlacklistedTokenModel) -> Result<bool, AppError> {
        debug!(jti = %entry.jti, "Blacklisting token in memory");

        let mut entries = self.lock()?;
        if entries.contains_key(&entry.jti) {
            warn!(jti = %entry.jti, "Token already blacklisted in memory");
            return Ok(false);
        }
        entries.insert(entry.jti.clone(), entry.expires_at);
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn contains(&self, jti: &str) -> Result<bool, AppError> {
        Ok(self.lock()?.contains_key(jti))
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut entries = self.lock()?;
        let initial_count = entries.len();

        entries.retain(|_, expires_at| *expires_at > now);

        let removed_count = initial_count - entries.len();
        debug!(
            expired_tokens_removed = removed_count,
            "Expired blacklist entries removed from memory"
        );
        Ok(removed_count as u64)
    }
}

/// PostgreSQL implementation of the token blacklist
pub struct PostgresBlacklistRepository {
    pool: PgPool,
}

impl PostgresBlacklistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlacklistRepository for PostgresBlacklistRepository {
    #[instrument(skip(self, entry))]
    async fn add(&self, entry: &BlacklistedTokenModel) -> Result<bool, AppError> {
        debug!(jti = %entry.jti, "Blacklisting token in database");

        let result = sqlx::query(
            "INSERT INTO token_blacklist (jti, expires_at) VALUES ($1, $2) ON CONFLICT (jti) DO NOTHING",
        )
        .bind(&entry.jti)
        .bind(entry.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to blacklist token");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn contains(&self, jti: &str) -> Result<bool, AppError> {
        let found: Option<String> =
            sqlx::query_scalar("SELECT jti FROM token_blacklist WHERE jti = $1")
                .bind(jti)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    warn!(error = %e, jti = %jti, "Failed to query token blacklist");
                    AppError::DatabaseError(e.to_string())
                })?;

        Ok(found.is_some())
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM token_blacklist WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to purge expired blacklist entries");
                AppError::DatabaseError(e.to_string())
            })?;

        let rows_affected = result.rows_affected();
        debug!(
            expired_tokens_removed = rows_affected,
            "Expired blacklist entries removed"
        );
        Ok(rows_affected)
    }
}
