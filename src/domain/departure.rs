// Departure extraction and normalization
use crate::domain::line::Line;
use crate::domain::train::{RowType, StopRow, Train};
use chrono::{DateTime, Utc};

pub const LABEL_PLACEHOLDER: &str = "N/A";
pub const TRACK_PLACEHOLDER: &str = "-";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DepartureError {
    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

/// Display-ready departure of one train from a line's origin station.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartureRecord {
    pub label: String,
    pub scheduled_time: DateTime<Utc>,
    pub estimate_time: Option<DateTime<Utc>>,
    pub delay_minutes: i64,
    pub cancelled: bool,
    pub track: String,
}

/// Finds the departure row of `train` at the line's station.
///
/// Returns `None` unless exactly one row matches station, row type and
/// track filter.
pub fn extract<'a>(train: &'a Train, line: &Line) -> Option<&'a StopRow> {
    let mut matches = train.time_table_rows.iter().filter(|row| {
        row.station_short_code == line.station
            && row.row_type == RowType::Departure
            && line.accepts_track(row.commercial_track.as_deref().map(str::trim))
    });

    let row = matches.next()?;
    if matches.next().is_some() {
        tracing::debug!(station = %line.station, line = %line.id, "Train departs more than once, skipping");
        return None;
    }
    Some(row)
}

pub fn normalize(row: &StopRow, train: &Train) -> Result<DepartureRecord, DepartureError> {
    let scheduled_time = parse_timestamp(&row.scheduled_time)?;

    let estimate_time = row
        .live_estimate_time
        .as_deref()
        .and_then(|value| match parse_timestamp(value) {
            Ok(time) => Some(time),
            Err(e) => {
                tracing::debug!("Ignoring live estimate: {}", e);
                None
            }
        });

    let delay_minutes = estimate_time
        .map(|estimate| delay_minutes(scheduled_time, estimate))
        .unwrap_or(0);

    let track = row
        .commercial_track
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(TRACK_PLACEHOLDER)
        .to_string();

    Ok(DepartureRecord {
        label: label_for(train),
        scheduled_time,
        estimate_time,
        delay_minutes,
        cancelled: row.cancelled.unwrap_or(false),
        track,
    })
}

/// Extracts and normalizes every train of a response, in response order.
/// Trains without a matching row or with a broken schedule are dropped.
pub fn departures_for(trains: &[Train], line: &Line) -> Vec<DepartureRecord> {
    trains
        .iter()
        .filter_map(|train| {
            let row = extract(train, line)?;
            match normalize(row, train) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(line = %line.id, "Dropping train: {}", e);
                    None
                }
            }
        })
        .collect()
}

fn label_for(train: &Train) -> String {
    if let Some(id) = train
        .commuter_line_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    {
        return id.to_string();
    }

    let train_type = train.train_type.as_deref().unwrap_or("");
    let number = train
        .train_number
        .as_ref()
        .map(|n| n.to_string())
        .unwrap_or_default();
    let label = format!("{} {}", train_type.trim(), number.trim());
    let label = label.trim();

    if label.is_empty() {
        LABEL_PLACEHOLDER.to_string()
    } else {
        label.to_string()
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DepartureError> {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| DepartureError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn delay_minutes(scheduled: DateTime<Utc>, estimate: DateTime<Utc>) -> i64 {
    let millis = (estimate - scheduled).num_milliseconds();
    (millis as f64 / 60_000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::train::TrainNumber;

    fn row(station: &str, row_type: RowType, track: Option<&str>) -> StopRow {
        StopRow {
            station_short_code: station.to_string(),
            row_type,
            scheduled_time: "2026-10-16T07:12:00.000Z".to_string(),
            live_estimate_time: None,
            cancelled: None,
            commercial_track: track.map(str::to_string),
        }
    }

    fn train(rows: Vec<StopRow>) -> Train {
        Train {
            commuter_line_id: Some("K".to_string()),
            train_type: Some("HL".to_string()),
            train_number: Some(TrainNumber::Number(9655)),
            time_table_rows: rows,
        }
    }

    fn helsinki() -> Line {
        Line::new("helsinki_ogeli", "Helsinki", "http://localhost", "HKI")
    }

    #[test]
    fn test_extract_requires_departure_at_station() {
        let t = train(vec![
            row("HKI", RowType::Arrival, Some("5")),
            row("OLK", RowType::Departure, Some("1")),
        ]);
        assert!(extract(&t, &helsinki()).is_none());
        assert!(departures_for(&[t], &helsinki()).is_empty());
    }

    #[test]
    fn test_extract_respects_track_filter() {
        let t = train(vec![row("HKI", RowType::Departure, Some("5"))]);
        assert!(extract(&t, &helsinki()).is_some());
        assert!(extract(&t, &helsinki().with_tracks(&["5", "6"])).is_some());
        assert!(extract(&t, &helsinki().with_tracks(&["1"])).is_none());
    }

    #[test]
    fn test_track_filter_ignores_padding() {
        let t = train(vec![row("HKI", RowType::Departure, Some(" 5 "))]);
        let line = helsinki().with_tracks(&["5"]);

        assert!(extract(&t, &line).is_some());
        let departures = departures_for(&[t], &line);
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].track, "5");
    }

    #[test]
    fn test_extract_rejects_ambiguous_rows() {
        let t = train(vec![
            row("HKI", RowType::Departure, Some("5")),
            row("HKI", RowType::Departure, Some("6")),
        ]);
        assert!(extract(&t, &helsinki()).is_none());
        assert!(extract(&t, &helsinki().with_tracks(&["6"])).is_some());
    }

    #[test]
    fn test_normalize_on_time() {
        let mut r = row("HKI", RowType::Departure, Some("5"));
        r.live_estimate_time = Some(r.scheduled_time.clone());
        let t = train(vec![r.clone()]);

        let record = normalize(&r, &t).unwrap();
        assert_eq!(record.label, "K");
        assert_eq!(record.delay_minutes, 0);
        assert_eq!(record.track, "5");
        assert!(!record.cancelled);
        assert_eq!(record.estimate_time, Some(record.scheduled_time));
    }

    #[test]
    fn test_normalize_delay_sign_and_rounding() {
        let mut r = row("HKI", RowType::Departure, None);
        let t = train(vec![]);

        r.live_estimate_time = Some("2026-10-16T07:15:00.000Z".to_string());
        assert_eq!(normalize(&r, &t).unwrap().delay_minutes, 3);

        r.live_estimate_time = Some("2026-10-16T07:13:40.000Z".to_string());
        assert_eq!(normalize(&r, &t).unwrap().delay_minutes, 2);

        r.live_estimate_time = Some("2026-10-16T07:10:00.000Z".to_string());
        assert_eq!(normalize(&r, &t).unwrap().delay_minutes, -2);

        // Offsets other than UTC are compared as instants
        r.live_estimate_time = Some("2026-10-16T10:13:00.000+03:00".to_string());
        assert_eq!(normalize(&r, &t).unwrap().delay_minutes, 1);
    }

    #[test]
    fn test_normalize_defaults() {
        let r = row("HKI", RowType::Departure, Some("  "));
        let t = Train {
            commuter_line_id: None,
            train_type: None,
            train_number: None,
            time_table_rows: vec![],
        };

        let record = normalize(&r, &t).unwrap();
        assert_eq!(record.label, LABEL_PLACEHOLDER);
        assert_eq!(record.track, TRACK_PLACEHOLDER);
        assert!(record.estimate_time.is_none());
        assert_eq!(record.delay_minutes, 0);
    }

    #[test]
    fn test_label_falls_back_to_type_and_number() {
        let mut t = train(vec![]);
        t.commuter_line_id = Some(" ".to_string());
        assert_eq!(label_for(&t), "HL 9655");

        t.train_type = None;
        assert_eq!(label_for(&t), "9655");

        t.train_type = Some("IC".to_string());
        t.train_number = None;
        assert_eq!(label_for(&t), "IC");
    }

    #[test]
    fn test_invalid_scheduled_time_drops_train() {
        let mut r = row("HKI", RowType::Departure, Some("5"));
        r.scheduled_time = "not a time".to_string();
        let t = train(vec![r.clone()]);

        assert!(matches!(
            normalize(&r, &t),
            Err(DepartureError::InvalidTimestamp { .. })
        ));
        assert!(departures_for(&[t], &helsinki()).is_empty());
    }

    #[test]
    fn test_invalid_estimate_is_ignored() {
        let mut r = row("HKI", RowType::Departure, Some("5"));
        r.live_estimate_time = Some("soon".to_string());
        r.cancelled = Some(true);
        let t = train(vec![r.clone()]);

        let record = normalize(&r, &t).unwrap();
        assert!(record.estimate_time.is_none());
        assert_eq!(record.delay_minutes, 0);
        assert!(record.cancelled);
    }
}
