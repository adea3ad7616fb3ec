// Poll loop - Periodic fetch, render and board update
use crate::application::board_sink::BoardSink;
use crate::application::train_repository::{FetchError, TimeWindow, TrainRepository};
use crate::domain::departure::departures_for;
use crate::domain::line::Line;
use crate::domain::time_format::TimeFormatter;
use crate::domain::train::Train;
use crate::infrastructure::html_renderer::{render_line, render_line_error, RenderOptions};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a cycle's sections reach the board.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// One container write per cycle, after every line has settled.
    #[default]
    Joined,
    /// One section write per line.
    PerLine,
}

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub window_before: chrono::Duration,
    pub window_after: chrono::Duration,
    pub write_mode: WriteMode,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            window_before: chrono::Duration::minutes(5),
            window_after: chrono::Duration::minutes(60),
            write_mode: WriteMode::Joined,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Fetching,
    Rendering,
    Scheduled(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Rendered { records: usize },
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub lines: Vec<(String, LineOutcome)>,
    pub elapsed: Duration,
}

impl CycleReport {
    pub fn failures(&self) -> usize {
        self.lines
            .iter()
            .filter(|(_, outcome)| matches!(outcome, LineOutcome::Failed { .. }))
            .count()
    }
}

pub struct PollLoop {
    lines: Vec<Line>,
    repository: Arc<dyn TrainRepository>,
    sink: Arc<dyn BoardSink>,
    settings: PollSettings,
    render: RenderOptions,
    state: PollState,
}

impl PollLoop {
    pub fn new(
        lines: Vec<Line>,
        repository: Arc<dyn TrainRepository>,
        sink: Arc<dyn BoardSink>,
        settings: PollSettings,
        render: RenderOptions,
    ) -> Self {
        Self {
            lines,
            repository,
            sink,
            settings,
            render,
            state: PollState::Idle,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Runs cycles forever. The next cycle is scheduled only after the
    /// previous one has written the board, so cycles never overlap.
    pub async fn run(mut self) {
        tracing::info!(
            lines = self.lines.len(),
            interval_ms = self.settings.interval.as_millis() as u64,
            "Starting poll loop"
        );

        let mut cycle: u64 = 0;
        loop {
            cycle += 1;
            let report = self.run_cycle(Utc::now()).await;

            for (line, outcome) in &report.lines {
                match outcome {
                    LineOutcome::Rendered { records } => {
                        tracing::debug!(cycle, line = %line, records, "Line updated");
                    }
                    LineOutcome::Failed { error } => {
                        tracing::debug!(cycle, line = %line, error = %error, "Line shows error card");
                    }
                }
            }
            tracing::debug!(
                cycle,
                failed = report.failures(),
                elapsed_ms = report.elapsed.as_millis() as u64,
                state = ?self.state(),
                "Poll cycle finished"
            );

            tokio::time::sleep(self.settings.interval).await;
        }
    }

    /// One tick: clock, concurrent fetch of every line, render, board write.
    pub async fn run_cycle(&mut self, now: DateTime<Utc>) -> CycleReport {
        let started = Instant::now();
        let formatter = TimeFormatter::new(self.render.time_zone);
        self.sink.set_clock(formatter.clock(now));

        self.state = PollState::Fetching;
        let window = TimeWindow::around(now, self.settings.window_before, self.settings.window_after);
        let results = join_all(
            self.lines
                .iter()
                .map(|line| self.repository.fetch_trains(line, &window)),
        )
        .await;

        self.state = PollState::Rendering;
        let mut sections = Vec::with_capacity(self.lines.len());
        let mut outcomes = Vec::with_capacity(self.lines.len());
        for (line, result) in self.lines.iter().zip(results) {
            let (html, outcome) = self.render_result(line, result);
            outcomes.push((line.id.clone(), outcome));
            sections.push((line.id.as_str(), html));
        }

        match self.settings.write_mode {
            WriteMode::Joined => {
                let container: String = sections.into_iter().map(|(_, html)| html).collect();
                self.sink.replace_container(container);
            }
            WriteMode::PerLine => {
                for (line_id, html) in sections {
                    self.sink.replace_section(line_id, html);
                }
            }
        }

        self.state = PollState::Scheduled(self.settings.interval);
        CycleReport {
            lines: outcomes,
            elapsed: started.elapsed(),
        }
    }

    fn render_result(
        &self,
        line: &Line,
        result: Result<Vec<Train>, FetchError>,
    ) -> (String, LineOutcome) {
        match result {
            Ok(trains) => {
                let records = departures_for(&trains, line);
                tracing::debug!(
                    line = %line.id,
                    trains = trains.len(),
                    departures = records.len(),
                    "Rendered line"
                );
                let html = render_line(line, &records, &self.render);
                (html, LineOutcome::Rendered { records: records.len() })
            }
            Err(e) => {
                tracing::warn!(line = %line.id, "Failed to fetch departures: {}", e);
                (
                    render_line_error(line),
                    LineOutcome::Failed {
                        error: e.to_string(),
                    },
                )
            }
        }
    }
}
