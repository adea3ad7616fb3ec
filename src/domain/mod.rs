// Domain layer - Lines, trains, departures and display preferences
pub mod departure;
pub mod line;
pub mod theme;
pub mod time_format;
pub mod train;
