//! Status polling for one ingestion job.
//!
//! Each watched source gets its own loop on a spawned task. The loop exits
//! on a terminal status, on a failed status query, when its handle sends
//! shutdown, or when the event receiver is dropped, so a poll can never
//! outlive either the job or its watcher.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::client::ApiClient;

use super::models::{Source, SourceStatus};

/// Delay between two status queries for the same source.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Messages to control an active poll loop
#[derive(Debug)]
pub enum PollerMessage {
    Shutdown,
}

/// What a poll loop reports back to its watcher.
#[derive(Debug)]
pub enum PollEvent {
    /// Non-terminal status observed; the job is still running.
    Status(Source),
    /// The job finished; dependent data (the generated cards) should be
    /// refreshed.
    Completed(Source),
    /// The job failed, or its status could no longer be queried.
    Failed { source_id: i64, reason: String },
}

/// Handle for one active poll loop
pub struct PollerHandle {
    sender: mpsc::Sender<PollerMessage>,
    join: tokio::task::JoinHandle<()>,
}

impl PollerHandle {
    /// Ask the loop to stop. Safe to call at any point in its lifetime.
    pub fn stop(&self) {
        let _ = self.sender.try_send(PollerMessage::Shutdown);
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Start polling a source's status on a fixed interval.
pub fn start_source_poll(
    client: Arc<ApiClient>,
    source_id: i64,
    interval: Duration,
) -> (PollerHandle, mpsc::Receiver<PollEvent>) {
    let (control_tx, control_rx) = mpsc::channel(4);
    let (event_tx, event_rx) = mpsc::channel(16);

    let join = tokio::spawn(async move {
        poll_loop(client, source_id, interval, control_rx, event_tx).await;
    });

    (
        PollerHandle {
            sender: control_tx,
            join,
        },
        event_rx,
    )
}

async fn poll_loop(
    client: Arc<ApiClient>,
    source_id: i64,
    interval: Duration,
    mut control: mpsc::Receiver<PollerMessage>,
    events: mpsc::Sender<PollEvent>,
) {
    log::debug!("source {}: poll loop started", source_id);

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                let path = format!("api/v1/ingest/{}/", source_id);
                let source: Source = match client.get_json(&path).await {
                    Ok(source) => source,
                    Err(err) => {
                        // A dead job must not be polled forever.
                        log::warn!(
                            "source {}: status query failed, treating job as failed: {}",
                            source_id, err
                        );
                        let _ = events
                            .send(PollEvent::Failed { source_id, reason: err.to_string() })
                            .await;
                        break;
                    }
                };

                match source.status {
                    SourceStatus::Completed => {
                        log::info!("source {}: ingestion completed", source_id);
                        let _ = events.send(PollEvent::Completed(source)).await;
                        break;
                    }
                    SourceStatus::Failed => {
                        let reason = source
                            .failure_detail()
                            .unwrap_or("ingestion failed")
                            .to_string();
                        log::info!("source {}: ingestion failed: {}", source_id, reason);
                        let _ = events.send(PollEvent::Failed { source_id, reason }).await;
                        break;
                    }
                    SourceStatus::Pending | SourceStatus::Processing => {
                        if events.send(PollEvent::Status(source)).await.is_err() {
                            // Watcher went away; nothing left to report to.
                            break;
                        }
                    }
                }
            }

            msg = control.recv() => {
                match msg {
                    Some(PollerMessage::Shutdown) | None => {
                        log::debug!("source {}: poll loop shut down", source_id);
                        break;
                    }
                }
            }
        }
    }
}
