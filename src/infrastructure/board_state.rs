// In-memory board, written by the poll loop and read by HTTP handlers
use crate::application::board_sink::BoardSink;
use crate::domain::line::Line;
use crate::infrastructure::html_renderer::render_line_loading;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSnapshot {
    pub clock: String,
    /// Markup served as the board container.
    pub container: String,
    sections: Vec<(String, String)>,
    pub version: u64,
}

impl BoardSnapshot {
    fn join_sections(&mut self) {
        self.container = self.sections.iter().map(|(_, html)| html.as_str()).collect();
    }
}

pub struct BoardState {
    tx: watch::Sender<BoardSnapshot>,
}

impl BoardState {
    /// Starts with a loading section for every line, in configured order.
    pub fn new(lines: &[Line]) -> Self {
        let mut snapshot = BoardSnapshot {
            sections: lines
                .iter()
                .map(|line| (line.id.clone(), render_line_loading(line)))
                .collect(),
            ..Default::default()
        };
        snapshot.join_sections();

        let (tx, _rx) = watch::channel(snapshot);
        Self { tx }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.tx.subscribe()
    }
}

impl BoardSink for BoardState {
    fn set_clock(&self, text: String) {
        // Clock ticks alone do not notify subscribers
        self.tx.send_if_modified(|board| {
            board.clock = text;
            false
        });
    }

    fn replace_container(&self, html: String) {
        self.tx.send_modify(|board| {
            board.container = html;
            board.version += 1;
        });
    }

    fn replace_section(&self, line_id: &str, html: String) {
        self.tx.send_modify(|board| {
            match board.sections.iter_mut().find(|(id, _)| id == line_id) {
                Some(section) => section.1 = html,
                None => board.sections.push((line_id.to_string(), html)),
            }
            board.join_sections();
            board.version += 1;
        });
    }
}
