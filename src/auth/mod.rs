// Public API - what other modules can use
pub use handlers::{login, register};
pub use service::AuthService;
pub use types::{CredentialsRequest, RegisterResponse};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
mod types;
