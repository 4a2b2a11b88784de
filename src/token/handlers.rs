use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    cookies::{extract_refresh_token, refresh_cookie, removal_cookie},
    service::TokenService,
    types::{TokenPair, TokenResponse},
};
use crate::shared::{AppError, AppState};

/// Builds the response for a newly issued pair: access token in the body,
/// refresh token in the cookie, caching disabled
pub fn grant_response(pair: &TokenPair) -> Response {
    let cookie = refresh_cookie(&pair.refresh_token, pair.refresh_expires_in);

    (
        StatusCode::OK,
        [
            (header::SET_COOKIE, cookie.to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
            (header::PRAGMA, "no-cache".to_string()),
        ],
        Json(TokenResponse::from(pair)),
    )
        .into_response()
}

fn token_service(state: &AppState) -> TokenService {
    TokenService::new(
        state.token_config.clone(),
        Arc::clone(&state.blacklist_repository),
    )
}

/// HTTP handler for rotating the token pair
///
/// POST /token
/// Reads the refresh cookie and returns a new access token and refresh cookie
#[instrument(name = "refresh_token", skip(state, headers))]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let refresh_token = extract_refresh_token(&headers)?;

    let pair = token_service(&state).refresh(&refresh_token).await?;

    info!("Token pair refreshed");
    Ok(grant_response(&pair))
}

/// HTTP handler for logging out
///
/// POST /token/logout
/// Blacklists the refresh token and clears the cookie
#[instrument(name = "logout", skip(state, headers))]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let refresh_token = extract_refresh_token(&headers)?;

    token_service(&state).revoke(&refresh_token).await?;

    info!("Logged out");
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, removal_cookie().to_string())],
    )
        .into_response())
}
