// Output port for the rendered board

/// Receives board updates from the poll loop. Writes replace previous
/// content entirely.
pub trait BoardSink: Send + Sync {
    fn set_clock(&self, text: String);

    /// Replace the whole board container with the joined line sections.
    fn replace_container(&self, html: String);

    /// Replace a single line's section, leaving the others untouched.
    fn replace_section(&self, line_id: &str, html: String);
}
