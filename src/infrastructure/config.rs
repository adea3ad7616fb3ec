use crate::application::poll_loop::{PollSettings, WriteMode};
use crate::domain::line::Line;
use crate::infrastructure::html_renderer::{DelayBadgePolicy, RenderOptions};
use anyhow::Context;
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

const CONFIG_FILE: &str = "config/junat";

#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub preferences: PreferenceSettings,
    #[serde(default = "default_lines")]
    pub lines: Vec<Line>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_window_before")]
    pub window_before_minutes: i64,
    #[serde(default = "default_window_after")]
    pub window_after_minutes: i64,
    #[serde(default)]
    pub write_mode: WriteMode,
    /// Upstream requests have no timeout unless this is set.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    #[serde(default)]
    pub delay_badge: DelayBadgePolicy,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PreferenceSettings {
    #[serde(default = "default_preference_path")]
    pub path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            window_before_minutes: default_window_before(),
            window_after_minutes: default_window_after(),
            write_mode: WriteMode::default(),
            request_timeout_secs: None,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            delay_badge: DelayBadgePolicy::default(),
            time_zone: default_time_zone(),
        }
    }
}

impl Default for PreferenceSettings {
    fn default() -> Self {
        Self {
            path: default_preference_path(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_interval_ms() -> u64 {
    30_000
}

fn default_window_before() -> i64 {
    5
}

fn default_window_after() -> i64 {
    60
}

fn default_max_rows() -> usize {
    6
}

fn default_time_zone() -> String {
    "Europe/Helsinki".to_string()
}

fn default_preference_path() -> String {
    "state/preferences.toml".to_string()
}

fn default_lines() -> Vec<Line> {
    vec![
        Line::new(
            "helsinki_ogeli",
            "Helsinki → Oulunkylä",
            "https://rata.digitraffic.fi/api/v1/live-trains/station/HKI/OLK",
            "HKI",
        ),
        Line::new(
            "ogeli_helsinki",
            "Oulunkylä → Helsinki",
            "https://rata.digitraffic.fi/api/v1/live-trains/station/OLK/HKI",
            "OLK",
        ),
    ]
}

impl BoardConfig {
    pub fn time_zone(&self) -> anyhow::Result<Tz> {
        self.render
            .time_zone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid time zone '{}': {}", self.render.time_zone, e))
    }

    pub fn render_options(&self) -> anyhow::Result<RenderOptions> {
        Ok(RenderOptions {
            max_rows: self.render.max_rows,
            delay_badge: self.render.delay_badge,
            time_zone: self.time_zone()?,
        })
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.poll.interval_ms),
            window_before: chrono::Duration::minutes(self.poll.window_before_minutes),
            window_after: chrono::Duration::minutes(self.poll.window_after_minutes),
            write_mode: self.poll.write_mode,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.poll.request_timeout_secs.map(Duration::from_secs)
    }

    fn validate(self) -> anyhow::Result<Self> {
        if self.lines.is_empty() {
            anyhow::bail!("at least one line must be configured");
        }
        if self.poll.interval_ms == 0 {
            anyhow::bail!("poll.interval_ms must be positive");
        }
        self.time_zone()?;
        Ok(self)
    }
}

pub fn load_board_config() -> anyhow::Result<BoardConfig> {
    load_board_config_from(CONFIG_FILE)
}

/// Loads `<name>.toml` (or any format the `config` crate recognizes) on top of
/// the built-in defaults. A missing file yields the defaults.
pub fn load_board_config_from(name: &str) -> anyhow::Result<BoardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(name).required(false))
        .build()
        .with_context(|| format!("Failed to read configuration {}", name))?;

    let board: BoardConfig = settings
        .try_deserialize()
        .context("Failed to parse board configuration")?;

    board.validate()
}
