use serde::{Deserialize, Serialize};

/// JWT claims carried by both access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub username: String,
    pub jti: String, // UUID v4, blacklist key for refresh tokens
    pub exp: usize,  // Expiration timestamp (standard JWT claim)
    pub iat: usize,  // Issued at timestamp (standard JWT claim)
}

/// Freshly minted access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token validity in seconds
    pub expires_in: i64,
    /// Refresh token validity in seconds, used for the cookie max-age
    pub refresh_expires_in: i64,
}

/// Response body for login and token refresh (OAuth 2.0 style)
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<&TokenPair> for TokenResponse {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access_token: pair.access_token.clone(),
            token_type: "bearer".to_string(),
            expires_in: pair.expires_in,
        }
    }
}

/// Identity resolved by the bearer middleware, available to handlers as an extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}
