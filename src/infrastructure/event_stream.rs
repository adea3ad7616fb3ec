// Server-sent events carrying board updates
use crate::infrastructure::board_state::BoardSnapshot;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;

pub const BOARD_EVENT: &str = "board";
pub const CLOCK_EVENT: &str = "clock";

/// A clock event and a board event per board write, starting with the
/// current board.
pub fn board_events(
    rx: watch::Receiver<BoardSnapshot>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        let mut updates = WatchStream::new(rx);
        while let Some(snapshot) = updates.next().await {
            yield Ok(Event::default().event(CLOCK_EVENT).data(snapshot.clock));
            yield Ok(Event::default()
                .event(BOARD_EVENT)
                .id(snapshot.version.to_string())
                .data(snapshot.container));
        }
    }
}

pub fn board_sse(
    rx: watch::Receiver<BoardSnapshot>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(board_events(rx)).keep_alive(KeepAlive::default())
}
