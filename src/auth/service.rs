use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{hash_password, UserModel},
    repository::UserRepository,
    types::{CredentialsRequest, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH},
};
use crate::shared::AppError;

/// Service for registration and credential checks
pub struct AuthService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    bcrypt_cost: u32,
}

/// Rejects usernames and passwords outside the allowed lengths
pub fn validate_registration(request: &CredentialsRequest) -> Result<(), AppError> {
    let username_length = request.username.chars().count();
    let password_length = request.password.chars().count();

    if username_length < MIN_USERNAME_LENGTH {
        return Err(AppError::bad_request(
            "Too short username",
            format!("Minimum {} characters", MIN_USERNAME_LENGTH),
        ));
    }
    if username_length > MAX_USERNAME_LENGTH {
        return Err(AppError::bad_request(
            "Too long username",
            format!("Maximum {} characters", MAX_USERNAME_LENGTH),
        ));
    }
    if password_length < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(
            "Too short password",
            format!("Minimum {} characters", MIN_PASSWORD_LENGTH),
        ));
    }

    Ok(())
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

impl AuthService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>, bcrypt_cost: u32) -> Self {
        Self {
            repository,
            bcrypt_cost,
        }
    }

    /// Validates and stores a new user with a hashed password
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: CredentialsRequest) -> Result<UserModel, AppError> {
        validate_registration(&request)?;

        if self.repository.find_user(&request.username).await?.is_some() {
            warn!("Registration rejected, username taken");
            return Err(AppError::Conflict(format!(
                "User '{}' already exists",
                request.username
            )));
        }

        let cost = self.bcrypt_cost;
        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))??;

        let user = UserModel::new(request.username, password_hash);
        // The insert still fails with Conflict if a concurrent request won the name
        self.repository.create_user(&user).await?;

        info!("User registered");
        Ok(user)
    }

    /// Checks credentials, returning the user on success.
    /// Unknown users and wrong passwords are indistinguishable to the caller.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn authenticate(&self, request: CredentialsRequest) -> Result<UserModel, AppError> {
        let user = self
            .repository
            .find_user(&request.username)
            .await?
            .ok_or_else(|| {
                warn!("Login attempt for unknown user");
                invalid_credentials()
            })?;

        let candidate = user.clone();
        let password = request.password;
        let matches = tokio::task::spawn_blocking(move || candidate.verify_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))??;

        if !matches {
            warn!("Login attempt with wrong password");
            return Err(invalid_credentials());
        }

        info!("User authenticated");
        Ok(user)
    }
}
