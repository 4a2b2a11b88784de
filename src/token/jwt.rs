use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::types::{TokenClaims, TokenPair};
use crate::shared::AppError;

/// Seconds past `exp` during which a token still validates
pub const EXPIRY_LEEWAY_SECS: u64 = 60;

/// Which secret a token is signed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signing secrets and lifetimes for access and refresh tokens
#[derive(Clone)]
pub struct TokenConfig {
    access_secret: String,
    refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
        }
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.access_secret.as_bytes(),
            TokenKind::Refresh => self.refresh_secret.as_bytes(),
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Creates a signed token of the given kind with a fresh jti
    #[instrument(skip(self, username))]
    pub fn create_token(&self, kind: TokenKind, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + self.ttl(kind)).timestamp().max(0) as usize;

        let claims = TokenClaims {
            username: username.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp,
            iat: now.timestamp() as usize,
        };

        debug!(exp_timestamp = exp, jti = %claims.jti, "Creating JWT token");

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret(kind)),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::Internal(format!("failed to encode token: {}", e))
        })
    }

    /// Validates signature and expiry, returning the claims if valid
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, AppError> {
        let mut validation = Validation::default();
        validation.leeway = EXPIRY_LEEWAY_SECS;

        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret(kind)),
            &validation,
        )
        .map(|data| {
            debug!(
                username = %data.claims.username,
                jti = %data.claims.jti,
                exp = data.claims.exp,
                "JWT token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Issues a new access/refresh pair bound to the username
    pub fn issue_pair(&self, username: &str) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.create_token(TokenKind::Access, username)?,
            refresh_token: self.create_token(TokenKind::Refresh, username)?,
            expires_in: self.access_ttl.num_seconds(),
            refresh_expires_in: self.refresh_ttl.num_seconds(),
        })
    }
}
