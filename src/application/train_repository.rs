// Repository trait for live train data
use crate::domain::line::Line;
use crate::domain::train::Train;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// Departure window sent upstream with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn around(now: DateTime<Utc>, before: Duration, after: Duration) -> Self {
        Self {
            start: now - before,
            end: now + after,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait TrainRepository: Send + Sync {
    /// Fetch the trains of `line` scheduled within `window`, in upstream order
    async fn fetch_trains(&self, line: &Line, window: &TimeWindow) -> Result<Vec<Train>, FetchError>;
}
