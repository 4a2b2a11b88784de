use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::service::TokenService;
use crate::shared::{AppError, AppState};

/// Bearer authentication middleware. Validates the access token in the
/// Authorization header and adds an `AuthenticatedUser` to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), token::jwt_auth))
/// Handlers can then extract Extension(user): Extension<AuthenticatedUser>.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    debug!(uri = %req.uri(), "Bearer authentication middleware triggered");

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            warn!("Invalid Authorization header format (expected Bearer token)");
            AppError::Unauthorized("Invalid authorization header format".to_string())
        })?;

    let service = TokenService::new(
        state.token_config.clone(),
        Arc::clone(&state.blacklist_repository),
    );
    let user = service.authenticate(token).map_err(|e| {
        warn!("Bearer authentication failed: {}", e);
        e
    })?;

    debug!(username = %user.username, "Authentication successful");

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
