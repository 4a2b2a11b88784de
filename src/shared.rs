use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::auth::repository::UserRepository;
use crate::posts::repository::PostRepository;
use crate::token::repository::BlacklistRepository;
use crate::token::TokenConfig;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub post_repository: Arc<dyn PostRepository + Send + Sync>,
    pub blacklist_repository: Arc<dyn BlacklistRepository + Send + Sync>,
    pub token_config: TokenConfig,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        post_repository: Arc<dyn PostRepository + Send + Sync>,
        blacklist_repository: Arc<dyn BlacklistRepository + Send + Sync>,
        token_config: TokenConfig,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            user_repository,
            post_repository,
            blacklist_repository,
            token_config,
            bcrypt_cost,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {title}")]
    BadRequest { title: String, detail: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(title: impl Into<String>, detail: impl Into<String>) -> Self {
        AppError::BadRequest {
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Title and detail pair of an error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorMessage {
    pub title: String,
    pub detail: String,
}

/// Wire format of every error: `{"message": {"title", "detail"}, "code"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub message: ErrorMessage,
    pub code: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (title, detail) = match self {
            AppError::BadRequest { title, detail } => (title, detail),
            AppError::Unauthorized(msg) => ("Unauthorized".to_string(), msg),
            // Token parse failures all look the same to the client
            AppError::JwtError(_) => (
                "Unauthorized".to_string(),
                "Invalid credentials".to_string(),
            ),
            AppError::Forbidden(msg) => ("Forbidden".to_string(), msg),
            AppError::Conflict(msg) => ("Conflict".to_string(), msg),
            AppError::NotFound(msg) => ("Page not found".to_string(), msg),
            AppError::DatabaseError(msg) | AppError::Internal(msg) => {
                error!(error = %msg, "Request failed with internal error");
                ("Internal server error".to_string(), String::new())
            }
        };

        let body = Json(ErrorBody {
            message: ErrorMessage { title, detail },
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(error: AppError) -> (StatusCode, ErrorBody) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_keeps_title_and_detail() {
        let (status, body) =
            body_of(AppError::bad_request("Too short username", "Minimum 3 characters")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, 400);
        assert_eq!(body.message.title, "Too short username");
        assert_eq!(body.message.detail, "Minimum 3 characters");
    }

    #[tokio::test]
    async fn test_jwt_error_is_unauthorized_without_leaking_cause() {
        let (status, body) = body_of(AppError::JwtError("InvalidSignature".to_string())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.message.detail, "Invalid credentials");
    }

    #[tokio::test]
    async fn test_not_found_is_a_missing_page() {
        let (status, body) = body_of(AppError::NotFound("Page 3 does not exist".to_string())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message.title, "Page not found");
        assert_eq!(body.message.detail, "Page 3 does not exist");
    }

    #[tokio::test]
    async fn test_database_error_hides_detail() {
        let (status, body) =
            body_of(AppError::DatabaseError("connection refused".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, 500);
        assert_eq!(body.message.title, "Internal server error");
        assert!(body.message.detail.is_empty());
    }
}
