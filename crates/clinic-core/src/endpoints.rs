//! Endpoint paths and wire types of the clinic backend.

use serde::Deserialize;
use serde_json::Value;

use crate::types::UserSummary;

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Exchanges credentials for a bearer token.
pub const LOGIN: &str = "/login";

/// Creates a user account.
pub const REGISTER: &str = "/registerForm";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response from login.
///
/// Deployments of the backend disagree on the token field name, so both
/// `token` and `access_token` are accepted.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
}

impl LoginResponse {
    /// Token and user, preferring `token` over `access_token`. Blank tokens count
    /// as missing and a `user` without an email is dropped.
    pub fn into_parts(self) -> (Option<String>, Option<UserSummary>) {
        let token = self
            .token
            .filter(|t| !t.trim().is_empty())
            .or(self.access_token.filter(|t| !t.trim().is_empty()));
        let user = self
            .user
            .and_then(|user| serde_json::from_value::<UserSummary>(user).ok());
        (token, user)
    }
}

/// Error envelope returned on 4xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
}
