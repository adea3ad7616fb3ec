// HTTP request handlers
use crate::infrastructure::event_stream::board_sse;
use crate::infrastructure::html_renderer::{render_page, PageView};
use crate::infrastructure::html_response::{accepts_brotli, html_response, prefers_light};
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect},
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full board page
pub async fn index(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let theme = state.theme_service.current(prefers_light(&headers)).await;
    let snapshot = state.board.snapshot();

    let page = render_page(&PageView {
        theme,
        clock: &snapshot.clock,
        board: &snapshot.container,
        refresh_secs: state.refresh_secs,
    });

    match html_response(page, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Board container only
pub async fn board(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.board.snapshot();

    match html_response(snapshot.container, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Live board updates as server-sent events
pub async fn board_stream(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    board_sse(state.board.subscribe())
}

/// Flip the theme and go back to the board
pub async fn toggle_theme(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let theme = state.theme_service.toggle(prefers_light(&headers)).await;
    tracing::info!(theme = %theme, "Theme toggled");
    Redirect::to("/")
}
