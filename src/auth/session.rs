//! The user session: one owned object holding "who is logged in".
//!
//! Constructed once at startup and passed explicitly to whatever needs it;
//! there is no ambient global user.

use std::sync::Arc;

use crate::api::client::ApiClient;
use crate::api::error::ApiError;

use super::models::{
    CreateTokenRequest, CreateTokenResponse, RegisterRequest, TokenPair, UserProfile,
};
use super::tokens::TokenStore;

/// Where the session stands after bootstrap, login or logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Process-wide source of truth for the authenticated user.
pub struct SessionManager {
    client: Arc<ApiClient>,
    tokens: Arc<TokenStore>,
    user: Option<UserProfile>,
}

impl SessionManager {
    pub fn new(client: Arc<ApiClient>, tokens: Arc<TokenStore>) -> Self {
        Self {
            client,
            tokens,
            user: None,
        }
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Resolve a persisted session on process start.
    ///
    /// A stored token that no longer works clears the pair and resolves to
    /// anonymous; the user is never left in an ambiguous state.
    pub async fn bootstrap(&mut self) -> SessionState {
        if self.tokens.get().is_none() {
            return SessionState::Anonymous;
        }

        match self.client.get_json::<UserProfile>("auth/users/me/").await {
            Ok(profile) => {
                log::info!("restored session for {}", profile.username);
                self.user = Some(profile);
                SessionState::Authenticated
            }
            Err(err) => {
                match err {
                    // Expected lifecycle event for a stale token
                    ApiError::Unauthorized | ApiError::SessionExpired => {
                        log::debug!("stored session no longer valid: {}", err)
                    }
                    _ => log::warn!("failed to restore session: {}", err),
                }
                self.tokens.clear();
                self.user = None;
                SessionState::Anonymous
            }
        }
    }

    /// Exchange credentials for a token pair and fetch the profile.
    ///
    /// Rejected credentials surface as a single generic error, regardless of
    /// whether the username or the password was wrong.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<UserProfile, ApiError> {
        let request = CreateTokenRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let issued: CreateTokenResponse =
            match self.client.post_json("auth/jwt/create/", &request).await {
                Ok(issued) => issued,
                Err(ApiError::Unauthorized) | Err(ApiError::SessionExpired) => {
                    return Err(ApiError::AuthenticationRejected)
                }
                Err(err) => return Err(err),
            };

        self.tokens.set(&TokenPair {
            access: issued.access,
            refresh: issued.refresh,
        })?;

        let profile: UserProfile = self.client.get_json("auth/users/me/").await?;
        log::info!("logged in as {}", profile.username);
        self.user = Some(profile.clone());
        Ok(profile)
    }

    /// Create an account, then log in with the same credentials.
    ///
    /// A taken username or email surfaces as a conflict carrying the
    /// server's message.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ApiError> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        match self
            .client
            .post_json::<_, serde_json::Value>("auth/users/", &request)
            .await
        {
            Ok(_) => {}
            Err(ApiError::Server { status: 400, message }) => {
                return Err(ApiError::Conflict(message))
            }
            Err(err) => return Err(err),
        }

        self.login(username, password).await
    }

    /// Drop the session: both tokens and the identity. Purely local.
    pub fn logout(&mut self) {
        self.tokens.clear();
        self.user = None;
        log::info!("logged out");
    }
}
