use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    jwt::{TokenConfig, TokenKind, EXPIRY_LEEWAY_SECS},
    models::BlacklistedTokenModel,
    repository::BlacklistRepository,
    types::{AuthenticatedUser, TokenClaims, TokenPair},
};
use crate::shared::AppError;

/// Service for the access/refresh token lifecycle
pub struct TokenService {
    token_config: TokenConfig,
    blacklist: Arc<dyn BlacklistRepository + Send + Sync>,
}

impl TokenService {
    pub fn new(
        token_config: TokenConfig,
        blacklist: Arc<dyn BlacklistRepository + Send + Sync>,
    ) -> Self {
        Self {
            token_config,
            blacklist,
        }
    }

    #[instrument(skip(self))]
    pub fn issue_pair(&self, username: &str) -> Result<TokenPair, AppError> {
        let pair = self.token_config.issue_pair(username)?;
        info!(username = %username, "Issued token pair");
        Ok(pair)
    }

    /// Resolves the identity behind a bearer access token
    pub fn authenticate(&self, access_token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self
            .token_config
            .validate_token(TokenKind::Access, access_token)?;
        Ok(AuthenticatedUser {
            username: claims.username,
        })
    }

    /// Verifies a refresh token and rejects it if it has been revoked
    async fn verify_refresh_token(&self, refresh_token: &str) -> Result<TokenClaims, AppError> {
        let claims = self
            .token_config
            .validate_token(TokenKind::Refresh, refresh_token)?;

        if self.blacklist.contains(&claims.jti).await? {
            warn!(jti = %claims.jti, username = %claims.username, "Revoked refresh token reused");
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        Ok(claims)
    }

    /// Exchanges a valid refresh token for a new pair bound to the same username
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.verify_refresh_token(refresh_token).await?;
        info!(username = %claims.username, "Refreshing token pair");
        self.token_config.issue_pair(&claims.username)
    }

    /// Revokes a refresh token by recording its jti in the blacklist
    #[instrument(skip(self, refresh_token))]
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        let claims = self.verify_refresh_token(refresh_token).await?;

        let entry = BlacklistedTokenModel::new(claims.jti, claims.exp);
        if !self.blacklist.add(&entry).await? {
            // Lost a race with a concurrent logout of the same token
            warn!(jti = %entry.jti, "Refresh token already revoked");
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        info!(username = %claims.username, jti = %entry.jti, "Refresh token revoked");
        Ok(())
    }

    /// Removes blacklist entries whose tokens can no longer validate.
    /// Entries stay until `exp` is past the validation leeway, with one extra
    /// second since `exp` is checked at whole-second resolution.
    #[instrument(skip(self))]
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let cutoff = Utc::now() - Duration::seconds(EXPIRY_LEEWAY_SECS as i64 + 1);
        self.blacklist.purge_expired(cutoff).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::test_token_config;
    use crate::token::repository::InMemoryBlacklistRepository;

    fn service() -> (TokenService, Arc<InMemoryBlacklistRepository>) {
        let blacklist = Arc::new(InMemoryBlacklistRepository::new());
        (
            TokenService::new(test_token_config(), blacklist.clone()),
            blacklist,
        )
    }

    #[tokio::test]
    async fn test_refresh_issues_pair_for_same_user() {
        let (service, _) = service();
        let pair = service.issue_pair("alice").unwrap();

        let refreshed = service.refresh(&pair.refresh_token).await.unwrap();

        let user = service.authenticate(&refreshed.access_token).unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(refreshed.refresh_token, pair.refresh_token);
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let (service, _) = service();
        let pair = service.issue_pair("alice").unwrap();

        let result = service.refresh(&pair.access_token).await;
        assert!(matches!(result, Err(AppError::JwtError(_))));
    }

    #[tokio::test]
    async fn test_revoked_token_cannot_refresh() {
        let (service, blacklist) = service();
        let pair = service.issue_pair("alice").unwrap();

        service.revoke(&pair.refresh_token).await.unwrap();
        assert_eq!(blacklist.len(), 1);

        let result = service.refresh(&pair.refresh_token).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_revoke_twice_is_unauthorized() {
        let (service, _) = service();
        let pair = service.issue_pair("alice").unwrap();

        service.revoke(&pair.refresh_token).await.unwrap();
        let result = service.revoke(&pair.refresh_token).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_revoke_invalid_token_does_not_blacklist() {
        let (service, blacklist) = service();

        let result = service.revoke("not-a-token").await;
        assert!(matches!(result, Err(AppError::JwtError(_))));
        assert!(blacklist.is_empty());
    }

    #[tokio::test]
    async fn test_expired_refresh_token_is_rejected() {
        let blacklist = Arc::new(InMemoryBlacklistRepository::new());
        let expired_config =
            test_token_config().with_ttls(Duration::minutes(15), Duration::minutes(-5));
        let service = TokenService::new(expired_config, blacklist);
        let pair = service.issue_pair("alice").unwrap();

        let result = service.refresh(&pair.refresh_token).await;
        assert!(matches!(result, Err(AppError::JwtError(_))));
    }

    #[tokio::test]
    async fn test_revoked_token_inside_leeway_survives_purge() {
        let blacklist = Arc::new(InMemoryBlacklistRepository::new());
        let lapsed_config =
            test_token_config().with_ttls(Duration::minutes(15), Duration::seconds(-30));
        let service = TokenService::new(lapsed_config, blacklist.clone());
        let pair = service.issue_pair("alice").unwrap();

        // Past exp but still accepted by validation
        service.revoke(&pair.refresh_token).await.unwrap();
        assert_eq!(service.purge_expired().await.unwrap(), 0);
        assert_eq!(blacklist.len(), 1);

        let result = service.refresh(&pair.refresh_token).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_purge_removes_entries_past_leeway() {
        let (service, blacklist) = service();
        blacklist
            .add(&BlacklistedTokenModel {
                jti: "lapsed".to_string(),
                expires_at: Utc::now() - Duration::minutes(5),
            })
            .await
            .unwrap();

        assert_eq!(service.purge_expired().await.unwrap(), 1);
        assert!(blacklist.is_empty());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_refresh_token() {
        let (service, _) = service();
        let pair = service.issue_pair("alice").unwrap();

        assert!(service.authenticate(&pair.refresh_token).is_err());
        assert!(service.authenticate(&pair.access_token).is_ok());
    }
}
