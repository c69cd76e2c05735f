use serde::{Deserialize, Serialize};

use crate::types::User;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    /// Login name.
    pub username: &'a str,
    /// Plain-text password; sent over the configured transport only.
    pub password: &'a str,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest<'a> {
    /// Desired login name.
    pub username: &'a str,
    /// Contact address.
    pub email: &'a str,
    /// Plain-text password.
    pub password: &'a str,
}

/// Response shared by the login and signup endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    /// Whether the server accepted the request.
    #[serde(default)]
    pub success: bool,
    /// The account record on success.
    #[serde(default)]
    pub user: Option<User>,
    /// Bearer token on success.
    #[serde(default)]
    pub token: Option<String>,
    /// Server-provided explanation.
    #[serde(default)]
    pub message: Option<String>,
}
