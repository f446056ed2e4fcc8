//! Authenticated HTTP access to the RecallForge API.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
