use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::UserModel;
use crate::shared::AppError;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    /// Inserts a user. Fails with `AppError::Conflict` if the username is taken.
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError>;
    async fn find_user(&self, username: &str) -> Result<Option<UserModel>, AppError>;
}

fn username_taken(username: &str) -> AppError {
    AppError::Conflict(format!("User '{}' already exists", username))
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(username = %user.username, "Creating user in memory");

        let mut users = self
            .users
            .lock()
            .map_err(|_| AppError::DatabaseError("user store poisoned".to_string()))?;
        if users.contains_key(&user.username) {
            warn!(username = %user.username, "User already exists in memory");
            return Err(username_taken(&user.username));
        }
        users.insert(user.username.clone(), user.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_user(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        let users = self
            .users
            .lock()
            .map_err(|_| AppError::DatabaseError("user store poisoned".to_string()))?;
        Ok(users.get(username).cloned())
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(username = %user.username, "Creating user in database");

        sqlx::query("INSERT INTO users (username, password_hash, created_at) VALUES ($1, $2, $3)")
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                // The primary key decides concurrent registrations of one name
                sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
                    warn!(username = %user.username, "Username already taken");
                    username_taken(&user.username)
                }
                _ => {
                    warn!(error = %e, "Failed to create user in database");
                    AppError::DatabaseError(e.to_string())
                }
            })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_user(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>(
            "SELECT username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, username = %username, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })
    }
}
