// Application state for HTTP handlers
use crate::application::theme_service::ThemeService;
use crate::infrastructure::board_state::BoardState;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub board: Arc<BoardState>,
    pub theme_service: ThemeService,
    /// No-script page refresh, matching the poll interval.
    pub refresh_secs: u64,
}
