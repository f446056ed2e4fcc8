//! Authenticated HTTP client with transparent access token refresh.
//!
//! Every request carries the stored access token as a bearer credential.
//! A 401 response triggers at most one refresh-and-replay cycle for that
//! request; the replayed request's outcome, whatever it is, is what the
//! caller sees. Refresh itself is single-flight: concurrent 401s share one
//! refresh round trip through `refresh_gate`.

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth::models::{RefreshRequest, RefreshResponse, TokenPair};
use crate::auth::tokens::TokenStore;
use crate::config::ClientConfig;

use super::error::ApiError;

/// Progress of one outbound request through the refresh-and-replay flow.
/// `Retried` is terminal: a request that fails again after its single
/// replay is never refreshed a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SendState {
    Sent,
    Unauthorized,
    Refreshing,
    Retried,
}

/// HTTP client for the RecallForge API.
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<TokenStore>,
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    /// Create a new client against the configured server.
    pub fn new(config: &ClientConfig, tokens: Arc<TokenStore>) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            tokens,
            refresh_gate: Mutex::new(()),
        })
    }

    /// Build full URL for a path
    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None, None).await?;
        Ok(response.json().await?)
    }

    /// GET a JSON resource with query parameters.
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, Some(query), None).await?;
        Ok(response.json().await?)
    }

    /// POST a JSON body, decoding a JSON response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, path, None, Some(&body)).await?;
        Ok(response.json().await?)
    }

    /// DELETE a resource.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None, None).await?;
        Ok(())
    }

    /// Issue a request, refreshing the access token and replaying once if
    /// the first attempt comes back 401.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        let mut attempt_token = self.tokens.access_token();
        let mut state = SendState::Sent;

        loop {
            match state {
                SendState::Sent | SendState::Retried => {
                    let response = self
                        .dispatch(&method, &url, query, body, attempt_token.as_deref())
                        .await?;

                    if response.status() == StatusCode::UNAUTHORIZED && state == SendState::Sent {
                        state = SendState::Unauthorized;
                    } else {
                        return classify(response).await;
                    }
                }
                SendState::Unauthorized => {
                    log::debug!("{} {} returned 401, recovering", method, url);
                    state = SendState::Refreshing;
                }
                SendState::Refreshing => {
                    attempt_token = Some(self.refresh_access(attempt_token.as_deref()).await?);
                    state = SendState::Retried;
                }
            }
        }
    }

    async fn dispatch(
        &self,
        method: &Method,
        url: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&serde_json::Value>,
        access: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut request = self.client.request(method.clone(), url);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = access {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// Obtain a usable access token after a 401, refreshing if nobody else
    /// already has.
    ///
    /// `stale` is the token the failing request carried. Waiters that
    /// acquire the gate after another request refreshed find a newer token
    /// in the store and reuse it instead of spending a second round trip.
    async fn refresh_access(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _guard = self.refresh_gate.lock().await;

        let pair = match self.tokens.get() {
            Some(pair) => pair,
            // Nothing to refresh with; the original 401 stands.
            None => return Err(ApiError::Unauthorized),
        };
        if Some(pair.access.as_str()) != stale {
            return Ok(pair.access);
        }

        log::debug!("refreshing access token");
        let response = self
            .client
            .post(self.url("auth/jwt/refresh/"))
            .json(&RefreshRequest {
                refresh: pair.refresh.clone(),
            })
            .send()
            .await;

        let refreshed = match response {
            Ok(response) if response.status().is_success() => {
                response.json::<RefreshResponse>().await.ok()
            }
            _ => None,
        };

        match refreshed {
            Some(RefreshResponse { access }) => {
                self.tokens.set(&TokenPair {
                    access: access.clone(),
                    refresh: pair.refresh,
                })?;
                Ok(access)
            }
            None => {
                // Normal end-of-session lifecycle, not an application error.
                log::info!("token refresh failed, clearing stored session");
                self.tokens.clear();
                Err(ApiError::SessionExpired)
            }
        }
    }
}

/// Map a response onto the error taxonomy, passing 2xx through.
async fn classify(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    match status {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound(response.url().path().to_string())),
        StatusCode::CONFLICT => Err(ApiError::Conflict(response.text().await.unwrap_or_default())),
        status => Err(ApiError::Server {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{stub, TestBackend};
    use serde_json::Value;

    #[tokio::test]
    async fn test_attaches_bearer_and_succeeds() {
        let backend = TestBackend::start(stub::api()).await;
        let (client, tokens, _dir) = backend.client();
        tokens.set(&stub::valid_pair()).unwrap();

        let body: Value = client.get_json("protected/").await.unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(backend.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn test_401_refreshes_once_and_replays() {
        let backend = TestBackend::start(stub::api()).await;
        let (client, tokens, _dir) = backend.client();
        tokens.set(&stub::stale_pair()).unwrap();

        let body: Value = client.get_json("protected/").await.unwrap();
        assert_eq!(body["ok"], true);

        assert_eq!(backend.refresh_calls(), 1);
        assert_eq!(backend.protected_calls(), 2);
        // New access token persisted, refresh token untouched
        let stored = tokens.get().unwrap();
        assert_eq!(stored.access, stub::FRESH_ACCESS);
        assert_eq!(stored.refresh, stub::REFRESH);
    }

    #[tokio::test]
    async fn test_401_after_replay_propagates_without_second_refresh() {
        let backend = TestBackend::start(stub::api()).await;
        let (client, tokens, _dir) = backend.client();
        tokens.set(&stub::stale_pair()).unwrap();

        let result = client.get_json::<Value>("always-401/").await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert_eq!(backend.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_tokens() {
        let backend = TestBackend::start(stub::api()).await;
        let (client, tokens, _dir) = backend.client();
        // Unknown refresh token: the refresh endpoint will reject it
        tokens
            .set(&TokenPair {
                access: "stale".into(),
                refresh: "revoked".into(),
            })
            .unwrap();

        let result = client.get_json::<Value>("protected/").await;
        assert!(matches!(result, Err(ApiError::SessionExpired)));
        assert!(tokens.get().is_none());
    }

    #[tokio::test]
    async fn test_non_401_errors_pass_through_untouched() {
        let backend = TestBackend::start(stub::api()).await;
        let (client, tokens, _dir) = backend.client();
        tokens.set(&stub::valid_pair()).unwrap();

        let result = client.get_json::<Value>("boom/").await;
        match result {
            Err(ApiError::Server { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "kaboom");
            }
            other => panic!("expected server error, got {:?}", other.err()),
        }
        assert_eq!(backend.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn test_401_without_stored_tokens_propagates() {
        let backend = TestBackend::start(stub::api()).await;
        let (client, _tokens, _dir) = backend.client();

        let result = client.get_json::<Value>("protected/").await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert_eq!(backend.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let backend = TestBackend::start(stub::api()).await;
        let (client, tokens, _dir) = backend.client();
        tokens.set(&stub::stale_pair()).unwrap();

        let (a, b) = tokio::join!(
            client.get_json::<Value>("protected/"),
            client.get_json::<Value>("protected/"),
        );
        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(backend.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_typed_error() {
        let backend = TestBackend::start(stub::api()).await;
        let (client, tokens, _dir) = backend.client();
        tokens.set(&stub::valid_pair()).unwrap();

        let result = client.get_json::<Value>("missing/").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
