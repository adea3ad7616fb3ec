// Live-trains repository backed by the digitraffic REST API
use crate::application::train_repository::{FetchError, TimeWindow, TrainRepository};
use crate::domain::line::Line;
use crate::domain::train::Train;
use anyhow::Context;
use async_trait::async_trait;
use chrono::SecondsFormat;
use std::time::Duration;

const USER_HEADER: &str = "Digitraffic-User";
const USER_NAME: &str = "junat-board";

#[derive(Debug, Clone)]
pub struct DigitrafficRepository {
    client: reqwest::Client,
}

impl DigitrafficRepository {
    /// Requests never time out unless `timeout` is given.
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    fn build_query_url(base: &str, window: &TimeWindow) -> String {
        let start = window.start.to_rfc3339_opts(SecondsFormat::Millis, true);
        let end = window.end.to_rfc3339_opts(SecondsFormat::Millis, true);
        let separator = if base.contains('?') { '&' } else { '?' };
        format!(
            "{}{}startDate={}&endDate={}",
            base,
            separator,
            urlencoding::encode(&start),
            urlencoding::encode(&end)
        )
    }

    /// Decodes the train array. A train that does not match the expected
    /// shape is dropped on its own; only a body that is not an array fails.
    fn parse_trains(body: &[u8]) -> Result<Vec<Train>, FetchError> {
        let values: Vec<serde_json::Value> =
            serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<Train>(value) {
                Ok(train) => Some(train),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Dropping malformed train");
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl TrainRepository for DigitrafficRepository {
    async fn fetch_trains(&self, line: &Line, window: &TimeWindow) -> Result<Vec<Train>, FetchError> {
        let url = Self::build_query_url(&line.url, window);
        tracing::debug!(line = %line.id, url = %url, "Fetching live trains");

        let response = self
            .client
            .get(&url)
            .header(USER_HEADER, USER_NAME)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let trains = Self::parse_trains(&body)?;
        tracing::debug!(line = %line.id, trains = trains.len(), "Received live trains");
        Ok(trains)
    }
}
