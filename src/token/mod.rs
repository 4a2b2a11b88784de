// Public API - what other modules can use
pub use cleanup_task::start_blacklist_cleanup_task;
pub use handlers::{grant_response, logout, refresh_token};
pub use jwt::{TokenConfig, TokenKind, EXPIRY_LEEWAY_SECS};
pub use middleware::jwt_auth;
pub use service::TokenService;
pub use types::{AuthenticatedUser, TokenClaims, TokenPair, TokenResponse};

// Internal modules
mod cleanup_task;
pub mod cookies;
mod handlers;
mod jwt;
mod middleware;
pub mod models;
pub mod repository;
mod service;
mod types;
