use std::time::Duration;
use tracing::warn;

use crate::auth::models::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};

const DEV_ACCESS_SECRET: &str = "access-secret-change-in-production";
const DEV_REFRESH_SECRET: &str = "refresh-secret-change-in-production";

/// Process configuration read from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// PostgreSQL connection string; in-memory storage is used when unset
    pub database_url: Option<String>,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub bcrypt_cost: u32,
    pub blacklist_cleanup_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let database_url = lookup("DATABASE_URL").filter(|s| !s.is_empty());

        let access_token_secret = lookup("ACCESS_TOKEN_SECRET").unwrap_or_else(|| {
            warn!("ACCESS_TOKEN_SECRET not set, using development secret");
            DEV_ACCESS_SECRET.to_string()
        });

        let refresh_token_secret = lookup("REFRESH_TOKEN_SECRET").unwrap_or_else(|| {
            warn!("REFRESH_TOKEN_SECRET not set, using development secret");
            DEV_REFRESH_SECRET.to_string()
        });

        let bcrypt_cost = lookup("BCRYPT_COST")
            .and_then(|s| s.parse().ok())
            .filter(|cost| (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(cost))
            .unwrap_or(10);

        let cleanup_secs = lookup("BLACKLIST_CLEANUP_INTERVAL_SECS")
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(60 * 60);

        Self {
            port,
            database_url,
            access_token_secret,
            refresh_token_secret,
            bcrypt_cost,
            blacklist_cleanup_interval: Duration::from_secs(cleanup_secs),
        }
    }
}
