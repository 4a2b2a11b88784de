use serde::{Deserialize, Serialize};

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 20;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Request payload for both registration and login
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful registration
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisterResponse {
    pub username: String,
}
