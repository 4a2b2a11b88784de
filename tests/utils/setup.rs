use axum::Router;
use std::sync::Arc;

use postboard::{
    auth::repository::InMemoryUserRepository,
    build_router,
    posts::repository::InMemoryPostRepository,
    token::repository::InMemoryBlacklistRepository,
    AppState, TokenConfig,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const ACCESS_SECRET: &str = "integration-access-secret";
pub const REFRESH_SECRET: &str = "integration-refresh-secret";

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub posts: Arc<InMemoryPostRepository>,
    pub blacklist: Arc<InMemoryBlacklistRepository>,
    pub token_config: TokenConfig,
}

pub struct TestAppBuilder {
    token_config: TokenConfig,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            token_config: TokenConfig::new(ACCESS_SECRET, REFRESH_SECRET),
        }
    }

    pub fn with_token_config(mut self, token_config: TokenConfig) -> Self {
        self.token_config = token_config;
        self
    }

    pub fn build(self) -> TestApp {
        let users = Arc::new(InMemoryUserRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new());
        let blacklist = Arc::new(InMemoryBlacklistRepository::new());

        let state = AppState::new(
            users.clone(),
            posts.clone(),
            blacklist.clone(),
            self.token_config.clone(),
            postboard::auth::models::MIN_BCRYPT_COST,
        );

        TestApp {
            router: build_router(state),
            users,
            posts,
            blacklist,
            token_config: self.token_config,
        }
    }
}
