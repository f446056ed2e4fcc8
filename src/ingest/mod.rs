//! Content ingestion: submit a URL, then watch the server-side job that
//! turns it into flashcards.

pub(crate) mod models;
pub mod poller;

pub use models::{Source, SourceStatus, SubmitSourceRequest};
pub use poller::{start_source_poll, PollEvent, PollerHandle, DEFAULT_POLL_INTERVAL};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::client::ApiClient;
use crate::api::error::ApiError;

/// Tracks active ingestion jobs and their poll loops.
///
/// The handle map guarantees at most one live poll per source id; distinct
/// sources poll concurrently and independently.
pub struct IngestManager {
    client: Arc<ApiClient>,
    interval: Duration,
    active: Mutex<HashMap<i64, PollerHandle>>,
}

impl IngestManager {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_interval(client, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(client: Arc<ApiClient>, interval: Duration) -> Self {
        Self {
            client,
            interval,
            active: Mutex::new(HashMap::new()),
        }
    }

    /// Submit a URL for ingestion into a deck. The returned record starts
    /// out PENDING or PROCESSING.
    pub async fn submit(&self, url: &str, deck: i64) -> Result<Source, ApiError> {
        let request = SubmitSourceRequest {
            url: url.to_string(),
            deck,
        };
        let source: Source = self.client.post_json("api/v1/ingest/", &request).await?;
        log::info!("submitted {} for ingestion as source {}", source.url, source.id);
        Ok(source)
    }

    /// Fetch the current record for one source.
    pub async fn source(&self, source_id: i64) -> Result<Source, ApiError> {
        self.client
            .get_json(&format!("api/v1/ingest/{}/", source_id))
            .await
    }

    /// Start watching a submitted source. Returns `None` if a poll loop for
    /// this id is already live.
    pub fn watch(&self, source_id: i64) -> Option<mpsc::Receiver<PollEvent>> {
        let mut active = self.active.lock().unwrap();
        // Reap loops that already reached a terminal state
        active.retain(|_, handle| !handle.is_finished());

        if active.contains_key(&source_id) {
            return None;
        }

        let (handle, events) =
            poller::start_source_poll(Arc::clone(&self.client), source_id, self.interval);
        active.insert(source_id, handle);
        Some(events)
    }

    /// Submit a URL and immediately start watching the new source.
    pub async fn submit_and_watch(
        &self,
        url: &str,
        deck: i64,
    ) -> Result<(Source, mpsc::Receiver<PollEvent>), ApiError> {
        let source = self.submit(url, deck).await?;
        match self.watch(source.id) {
            Some(events) => Ok((source, events)),
            // The server handed out an id that already has a live poll
            None => Err(ApiError::Conflict(format!(
                "source {} is already being watched",
                source.id
            ))),
        }
    }

    /// Stop the poll loop for one source, if active.
    pub fn stop(&self, source_id: i64) {
        if let Some(handle) = self.active.lock().unwrap().remove(&source_id) {
            handle.stop();
        }
    }

    /// Stop every active poll loop. Used at process teardown.
    pub fn shutdown(&self) {
        let mut active = self.active.lock().unwrap();
        for (_, handle) in active.drain() {
            handle.stop();
        }
    }

    /// Number of poll loops still running.
    pub fn active_count(&self) -> usize {
        let mut active = self.active.lock().unwrap();
        active.retain(|_, handle| !handle.is_finished());
        active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client_for, spawn};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    const INTERVAL: Duration = Duration::from_millis(10);

    /// Sources 7 and 8 poll PENDING forever; submission creates source 7.
    fn pending_api() -> Router {
        Router::new()
            .route(
                "/api/v1/ingest/",
                post(|Json(body): Json<serde_json::Value>| async move {
                    (
                        StatusCode::CREATED,
                        Json(json!({
                            "id": 7,
                            "url": body["url"],
                            "deck": body["deck"],
                            "status": "PENDING",
                        })),
                    )
                        .into_response()
                }),
            )
            .route(
                "/api/v1/ingest/{id}/",
                get(|| async {
                    Json(json!({
                        "id": 7,
                        "url": "https://example.com/article",
                        "deck": 3,
                        "status": "PENDING",
                    }))
                }),
            )
    }

    #[tokio::test]
    async fn test_submit_returns_initial_record() {
        let base_url = spawn(pending_api()).await;
        let (client, _tokens, _dir) = client_for(&base_url);
        let manager = IngestManager::with_interval(client, INTERVAL);

        let source = manager.submit("https://example.com/article", 3).await.unwrap();
        assert_eq!(source.id, 7);
        assert_eq!(source.deck, 3);
        assert_eq!(source.status, SourceStatus::Pending);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn test_one_live_poll_per_source() {
        let base_url = spawn(pending_api()).await;
        let (client, _tokens, _dir) = client_for(&base_url);
        let manager = IngestManager::with_interval(client, INTERVAL);

        let first = manager.watch(7);
        assert!(first.is_some());
        assert!(manager.watch(7).is_none());
        assert_eq!(manager.active_count(), 1);

        // A different source is independent
        let other = manager.watch(8);
        assert!(other.is_some());
        assert_eq!(manager.active_count(), 2);

        manager.shutdown();
    }

    #[tokio::test]
    async fn test_stop_frees_the_slot() {
        let base_url = spawn(pending_api()).await;
        let (client, _tokens, _dir) = client_for(&base_url);
        let manager = IngestManager::with_interval(client, INTERVAL);

        let _events = manager.watch(7).unwrap();
        manager.stop(7);

        // Once the loop winds down the id can be watched again
        for _ in 0..100 {
            if manager.active_count() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(manager.watch(7).is_some());
        manager.shutdown();
    }

    #[tokio::test]
    async fn test_submit_and_watch_wires_the_poll() {
        let base_url = spawn(pending_api()).await;
        let (client, _tokens, _dir) = client_for(&base_url);
        let manager = IngestManager::with_interval(client, INTERVAL);

        let (source, mut events) = manager
            .submit_and_watch("https://example.com/article", 3)
            .await
            .unwrap();
        assert_eq!(source.id, 7);
        assert!(matches!(events.recv().await, Some(PollEvent::Status(_))));
        manager.shutdown();
    }
}
