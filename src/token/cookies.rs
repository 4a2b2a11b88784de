use axum::http::{header, HeaderMap};
use cookie::{
    time::{Duration, OffsetDateTime},
    Cookie, SameSite,
};
use tracing::debug;

use crate::shared::AppError;

pub const REFRESH_COOKIE_NAME: &str = "jid";
pub const REFRESH_COOKIE_PATH: &str = "/token";

/// HTTP-only cookie carrying the refresh token, scoped to the token routes
pub fn refresh_cookie(refresh_token: &str, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE_NAME, refresh_token.to_string()))
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Cookie that overwrites and expires the refresh cookie
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE_NAME, ""))
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Reads the refresh token from the request cookies.
/// A missing cookie is Forbidden rather than Unauthorized.
pub fn extract_refresh_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| Cookie::parse(pair.trim()).ok())
        .find(|cookie| cookie.name() == REFRESH_COOKIE_NAME && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| {
            debug!("Request has no refresh token cookie");
            AppError::Forbidden("Missing refresh token cookie".to_string())
        })
}
