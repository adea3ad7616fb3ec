// Application layer - Use cases and the ports they depend on
pub mod board_sink;
pub mod poll_loop;
pub mod preference_store;
pub mod theme_service;
pub mod train_repository;
