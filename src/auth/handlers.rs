use axum::{extract::State, http::StatusCode, response::Response, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::AuthService,
    types::{CredentialsRequest, RegisterResponse},
};
use crate::extract::JsonBody;
use crate::shared::{AppError, AppState};
use crate::token::{grant_response, TokenService};

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(Arc::clone(&state.user_repository), state.bcrypt_cost)
}

/// HTTP handler for registering a new user
///
/// POST /register
/// Returns 201 with the username, 409 if it is taken
#[instrument(name = "register", skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let user = auth_service(&state).register(request).await?;

    info!(username = %user.username, "Registration successful");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            username: user.username,
        }),
    ))
}

/// HTTP handler for logging in
///
/// POST /login
/// Returns an access token in the body and the refresh token as a cookie
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CredentialsRequest>,
) -> Result<Response, AppError> {
    let user = auth_service(&state).authenticate(request).await?;

    let tokens = TokenService::new(
        state.token_config.clone(),
        Arc::clone(&state.blacklist_repository),
    );
    let pair = tokens.issue_pair(&user.username)?;

    info!(username = %user.username, "Login successful");
    Ok(grant_response(&pair))
}
