//! Data models for content ingestion jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-side job states. The client only ever reads these; transitions
/// are monotonic and driven entirely by the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl SourceStatus {
    /// Whether polling should stop at this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Wire spelling of the status, for display.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

/// A submitted URL being converted into flashcards.
#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    pub id: i64,
    pub url: String,
    pub deck: i64,
    pub status: SourceStatus,
    #[serde(default)]
    pub error_log: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Source {
    /// Failure detail, if the server recorded a non-empty one.
    pub fn failure_detail(&self) -> Option<&str> {
        self.error_log.as_deref().filter(|detail| !detail.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitSourceRequest {
    pub url: String,
    pub deck: i64,
}
