// Raw train records as returned by the live-trains API
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    #[serde(default, rename = "commuterLineID")]
    pub commuter_line_id: Option<String>,
    #[serde(default)]
    pub train_type: Option<String>,
    #[serde(default)]
    pub train_number: Option<TrainNumber>,
    #[serde(default)]
    pub time_table_rows: Vec<StopRow>,
}

/// The API sends train numbers as integers, older payloads as strings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TrainNumber {
    Number(u64),
    Text(String),
}

impl fmt::Display for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainNumber::Number(n) => write!(f, "{}", n),
            TrainNumber::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowType {
    Arrival,
    Departure,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRow {
    pub station_short_code: String,
    #[serde(rename = "type")]
    pub row_type: RowType,
    pub scheduled_time: String,
    #[serde(default)]
    pub live_estimate_time: Option<String>,
    #[serde(default)]
    pub cancelled: Option<bool>,
    #[serde(default)]
    pub commercial_track: Option<String>,
}
