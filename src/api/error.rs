use thiserror::Error;

/// Errors surfaced by API calls.
///
/// `AuthenticationRejected` and `Conflict` are meant for direct user
/// display; the rest are operational and handled at component boundaries.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid credentials")]
    AuthenticationRejected,
    #[error("Session expired")]
    SessionExpired,
    #[error("Not authorized")]
    Unauthorized,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },
    #[error("Token storage error: {0}")]
    Store(#[from] crate::auth::tokens::StoreError),
}
