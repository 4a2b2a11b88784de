// Library crate for the post board server
// This file exposes the public API for integration tests

pub mod auth;
pub mod config;
pub mod extract;
pub mod posts;
pub mod routes;
pub mod shared;
pub mod token;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use routes::build_router;
pub use shared::{AppError, AppState, ErrorBody};
pub use token::{TokenConfig, TokenResponse};
