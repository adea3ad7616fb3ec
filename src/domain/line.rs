// Line domain model
use serde::Deserialize;

/// A directional route watched from its origin station.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Line {
    pub id: String,
    pub name: String,
    pub url: String,
    pub station: String,
    /// Accepted commercial tracks; `None` accepts any track.
    #[serde(default)]
    pub tracks: Option<Vec<String>>,
}

impl Line {
    pub fn new(id: &str, name: &str, url: &str, station: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            station: station.to_string(),
            tracks: None,
        }
    }

    #[cfg(test)]
    pub fn with_tracks(mut self, tracks: &[&str]) -> Self {
        self.tracks = Some(tracks.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn accepts_track(&self, track: Option<&str>) -> bool {
        match &self.tracks {
            None => true,
            Some(allowed) => track.is_some_and(|t| allowed.iter().any(|a| a == t)),
        }
    }
}
