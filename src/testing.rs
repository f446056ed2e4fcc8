//! In-process stub of the RecallForge API, served over real HTTP so tests
//! exercise the full client stack.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;

use crate::api::ApiClient;
use crate::auth::tokens::TokenStore;
use crate::config::ClientConfig;

/// Serve a router on an ephemeral local port, returning its base URL.
pub(crate) async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}

/// Client + token store on a fresh temp data dir, pointed at `base_url`.
pub(crate) fn client_for(base_url: &str) -> (Arc<ApiClient>, Arc<TokenStore>, TempDir) {
    let dir = TempDir::new().expect("temp data dir");
    let tokens = Arc::new(TokenStore::new(dir.path()));
    let config = ClientConfig::with_base_url(base_url);
    let client = Arc::new(ApiClient::new(&config, Arc::clone(&tokens)).expect("stub client"));
    (client, tokens, dir)
}

/// The canned authentication backend plus counters for asserting on traffic.
pub(crate) struct TestBackend {
    base_url: String,
    counters: Arc<Counters>,
}

#[derive(Default)]
pub(crate) struct Counters {
    refresh: AtomicUsize,
    protected: AtomicUsize,
}

impl TestBackend {
    pub(crate) async fn start(api: stub::StubApi) -> Self {
        let base_url = spawn(api.router).await;
        Self {
            base_url,
            counters: api.counters,
        }
    }

    pub(crate) fn client(&self) -> (Arc<ApiClient>, Arc<TokenStore>, TempDir) {
        client_for(&self.base_url)
    }

    pub(crate) fn refresh_calls(&self) -> usize {
        self.counters.refresh.load(Ordering::SeqCst)
    }

    pub(crate) fn protected_calls(&self) -> usize {
        self.counters.protected.load(Ordering::SeqCst)
    }
}

pub(crate) mod stub {
    use super::*;
    use crate::auth::models::TokenPair;

    pub(crate) const VALID_ACCESS: &str = "access-valid";
    pub(crate) const FRESH_ACCESS: &str = "access-fresh";
    pub(crate) const STALE_ACCESS: &str = "access-stale";
    pub(crate) const REFRESH: &str = "refresh-1";

    pub(crate) fn valid_pair() -> TokenPair {
        TokenPair {
            access: VALID_ACCESS.to_string(),
            refresh: REFRESH.to_string(),
        }
    }

    pub(crate) fn stale_pair() -> TokenPair {
        TokenPair {
            access: STALE_ACCESS.to_string(),
            refresh: REFRESH.to_string(),
        }
    }

    pub(crate) struct StubApi {
        pub(crate) router: Router,
        pub(crate) counters: Arc<Counters>,
    }

    /// The canned API: djoser-style auth endpoints plus a few probe routes.
    pub(crate) fn api() -> StubApi {
        let counters = Arc::new(Counters::default());

        let router = Router::new()
            .route("/auth/jwt/create/", post(create_token))
            .route("/auth/jwt/refresh/", post(refresh_token))
            .route("/auth/users/me/", get(me))
            .route("/auth/users/", post(register))
            .route("/protected/", get(protected))
            .route("/always-401/", get(always_401))
            .route("/boom/", get(boom))
            .route("/missing/", get(missing))
            .with_state(Arc::clone(&counters));

        StubApi { router, counters }
    }

    fn bearer(headers: &HeaderMap) -> Option<&str> {
        headers
            .get("authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
    }

    fn authorized(headers: &HeaderMap) -> bool {
        matches!(bearer(headers), Some(VALID_ACCESS) | Some(FRESH_ACCESS))
    }

    fn unauthorized() -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Given token not valid for any token type"})),
        )
            .into_response()
    }

    async fn create_token(Json(body): Json<serde_json::Value>) -> Response {
        if body["username"] == "alice" && body["password"] == "pw123" {
            Json(json!({"access": VALID_ACCESS, "refresh": REFRESH})).into_response()
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "No active account found with the given credentials"})),
            )
                .into_response()
        }
    }

    async fn refresh_token(
        State(counters): State<Arc<Counters>>,
        Json(body): Json<serde_json::Value>,
    ) -> Response {
        counters.refresh.fetch_add(1, Ordering::SeqCst);
        if body["refresh"] == REFRESH {
            Json(json!({"access": FRESH_ACCESS})).into_response()
        } else {
            unauthorized()
        }
    }

    async fn me(headers: HeaderMap) -> Response {
        if authorized(&headers) {
            Json(json!({"id": 1, "username": "alice", "email": "alice@example.com"}))
                .into_response()
        } else {
            unauthorized()
        }
    }

    async fn register(Json(body): Json<serde_json::Value>) -> Response {
        if body["username"] == "taken" {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"username": ["A user with that username already exists."]})),
            )
                .into_response()
        } else {
            (
                StatusCode::CREATED,
                Json(json!({
                    "id": 2,
                    "username": body["username"],
                    "email": body["email"],
                })),
            )
                .into_response()
        }
    }

    async fn protected(State(counters): State<Arc<Counters>>, headers: HeaderMap) -> Response {
        counters.protected.fetch_add(1, Ordering::SeqCst);
        if authorized(&headers) {
            Json(json!({"ok": true})).into_response()
        } else {
            unauthorized()
        }
    }

    async fn always_401() -> Response {
        unauthorized()
    }

    async fn boom() -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "kaboom").into_response()
    }

    async fn missing() -> Response {
        (StatusCode::NOT_FOUND, "not here").into_response()
    }
}
