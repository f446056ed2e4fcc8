//! Data models for the authentication service.

use serde::{Deserialize, Serialize};

/// Access/refresh token pair as issued by the authentication service.
///
/// Both tokens are opaque to the client; expiry is only ever discovered
/// through a rejected request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived bearer credential attached to every authenticated call
    pub access: String,
    /// Longer-lived credential used solely to mint a new access token
    pub refresh: String,
}

/// Server-sourced profile of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CreateTokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTokenResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}
