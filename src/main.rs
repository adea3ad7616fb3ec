// Main entry point - Dependency injection, poll loop and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::application::poll_loop::PollLoop;
use crate::application::theme_service::ThemeService;
use crate::infrastructure::board_state::BoardState;
use crate::infrastructure::config::load_board_config;
use crate::infrastructure::digitraffic_repository::DigitrafficRepository;
use crate::infrastructure::preference_file::TomlPreferenceStore;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{board, board_stream, health_check, index, toggle_theme};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_board_config()?;
    let poll_settings = config.poll_settings();
    let render_options = config.render_options()?;

    // Create adapters (infrastructure layer)
    let repository = Arc::new(DigitrafficRepository::new(config.request_timeout())?);
    let board_state = Arc::new(BoardState::new(&config.lines));
    let preferences = Arc::new(TomlPreferenceStore::new(&config.preferences.path));

    // Start polling (application layer)
    let refresh_secs = poll_settings.interval.as_secs().max(1);
    let poll_loop = PollLoop::new(
        config.lines.clone(),
        repository,
        board_state.clone(),
        poll_settings,
        render_options,
    );
    tokio::spawn(poll_loop.run());

    let state = Arc::new(AppState {
        board: board_state,
        theme_service: ThemeService::new(preferences),
        refresh_secs,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/", get(index))
        .route("/board", get(board))
        .route("/board/stream", get(board_stream))
        .route("/theme/toggle", post(toggle_theme))
        .route("/healthz", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!(%addr, lines = config.lines.len(), "Starting junat-board");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
