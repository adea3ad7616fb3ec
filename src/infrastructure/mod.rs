// Infrastructure layer - External dependencies and adapters
pub mod board_state;
pub mod config;
pub mod digitraffic_repository;
pub mod event_stream;
pub mod html_renderer;
pub mod html_response;
pub mod preference_file;
