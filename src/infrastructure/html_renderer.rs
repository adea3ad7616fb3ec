// HTML rendering of board sections and the page shell
use crate::domain::departure::DepartureRecord;
use crate::domain::line::Line;
use crate::domain::theme::Theme;
use crate::domain::time_format::TimeFormatter;
use chrono_tz::Tz;
use serde::Deserialize;
use std::fmt::Write;

pub const NO_DEPARTURES: &str = "No departures";
pub const LOAD_FAILED: &str = "Departures could not be loaded";
pub const LOADING: &str = "Loading departures…";

/// Which live-estimate differences get a delay badge.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DelayBadgePolicy {
    /// Only late departures are flagged.
    #[default]
    PositiveOnly,
    /// Early departures are flagged too, with a negative count.
    Signed,
}

impl DelayBadgePolicy {
    fn badge(&self, record: &DepartureRecord) -> Option<String> {
        if record.cancelled {
            return None;
        }
        match (self, record.delay_minutes) {
            (_, d) if d > 0 => Some(format!("{} min", d)),
            (DelayBadgePolicy::Signed, d) if d < 0 => Some(format!("-{} min", d.abs())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub max_rows: usize,
    pub delay_badge: DelayBadgePolicy,
    pub time_zone: Tz,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_rows: 6,
            delay_badge: DelayBadgePolicy::default(),
            time_zone: chrono_tz::Europe::Helsinki,
        }
    }
}

/// Renders one line's section. Records are shown in the given order, at most
/// `options.max_rows` of them.
pub fn render_line(line: &Line, records: &[DepartureRecord], options: &RenderOptions) -> String {
    let formatter = TimeFormatter::new(options.time_zone);
    let mut html = String::new();

    let _ = write!(
        html,
        "<section class=\"line\" id=\"{}\">\n  <h2 class=\"line-name\">{}</h2>\n",
        html_escape(&line.id),
        html_escape(&line.name)
    );

    let shown = &records[..records.len().min(options.max_rows)];
    if shown.is_empty() {
        let _ = writeln!(html, "  <p class=\"no-departures\">{}</p>", NO_DEPARTURES);
    } else {
        html.push_str("  <ul class=\"departures\">\n");
        for record in shown {
            render_row(&mut html, record, options, &formatter);
        }
        html.push_str("  </ul>\n");
    }

    html.push_str("</section>\n");
    html
}

fn render_row(
    html: &mut String,
    record: &DepartureRecord,
    options: &RenderOptions,
    formatter: &TimeFormatter,
) {
    let row_class = if record.cancelled {
        "train-row cancelled"
    } else {
        "train-row"
    };

    let _ = writeln!(html, "    <li class=\"{}\">", row_class);
    let _ = writeln!(
        html,
        "      <span class=\"train-id\">{}</span>",
        html_escape(&record.label)
    );
    let _ = writeln!(
        html,
        "      <span class=\"departure\">{}</span>",
        formatter.short(record.scheduled_time)
    );
    if let Some(badge) = options.delay_badge.badge(record) {
        let class = if record.delay_minutes < 0 {
            "badge delay early"
        } else {
            "badge delay"
        };
        let _ = writeln!(html, "      <span class=\"{}\">{}</span>", class, badge);
    }
    if record.cancelled {
        html.push_str("      <span class=\"badge cancelled\">Cancelled</span>\n");
    }
    let _ = writeln!(
        html,
        "      <span class=\"track\">{}</span>",
        html_escape(&record.track)
    );
    html.push_str("    </li>\n");
}

pub fn render_line_error(line: &Line) -> String {
    format!(
        "<section class=\"line line-error\" id=\"{}\">\n  <h2 class=\"line-name\">{}</h2>\n  <p class=\"error\">{}</p>\n</section>\n",
        html_escape(&line.id),
        html_escape(&line.name),
        LOAD_FAILED
    )
}

/// Section shown before the first poll cycle has finished.
pub fn render_line_loading(line: &Line) -> String {
    format!(
        "<section class=\"line loading\" id=\"{}\">\n  <h2 class=\"line-name\">{}</h2>\n  <p class=\"loading\">{}</p>\n</section>\n",
        html_escape(&line.id),
        html_escape(&line.name),
        LOADING
    )
}

/// Everything the full page needs besides the board sections.
pub struct PageView<'a> {
    pub theme: Theme,
    pub clock: &'a str,
    pub board: &'a str,
    pub refresh_secs: u64,
}

pub fn render_page(view: &PageView<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fi" data-theme="{theme}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="theme-color" content="{color}">
  <noscript><meta http-equiv="refresh" content="{refresh}"></noscript>
  <title>Junat</title>
</head>
<body>
  <header>
    <h1 id="time">{clock}</h1>
    <form method="post" action="/theme/toggle">
      <button type="submit" id="theme-toggle" aria-label="{label}">{label}</button>
    </form>
  </header>
  <main id="board">
{board}  </main>
  <script>
    const updates = new EventSource("/board/stream");
    updates.addEventListener("clock", (e) => {{ document.getElementById("time").textContent = e.data; }});
    updates.addEventListener("board", (e) => {{ document.getElementById("board").innerHTML = e.data; }});
  </script>
</body>
</html>
"#,
        theme = view.theme.as_str(),
        color = view.theme.meta_color(),
        refresh = view.refresh_secs.max(1),
        clock = html_escape(view.clock),
        label = view.theme.toggle_label(),
        board = view.board,
    )
}

pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn line() -> Line {
        Line::new("helsinki_ogeli", "Helsinki → Oulunkylä", "http://localhost", "HKI")
    }

    fn record(label: &str, minute: u32, delay: i64, cancelled: bool) -> DepartureRecord {
        let scheduled = Utc.with_ymd_and_hms(2026, 10, 16, 5, minute, 0).unwrap();
        DepartureRecord {
            label: label.to_string(),
            scheduled_time: scheduled,
            estimate_time: Some(scheduled + Duration::minutes(delay)),
            delay_minutes: delay,
            cancelled,
            track: "4".to_string(),
        }
    }

    fn row_count(html: &str) -> usize {
        html.matches("<li class=\"train-row").count()
    }

    #[test]
    fn test_renders_header_and_rows() {
        let html = render_line(&line(), &[record("K", 12, 0, false)], &RenderOptions::default());

        assert!(html.contains("<h2 class=\"line-name\">Helsinki → Oulunkylä</h2>"));
        assert!(html.contains("<span class=\"train-id\">K</span>"));
        // 05:12 UTC is 08:12 in Helsinki summer time
        assert!(html.contains("<span class=\"departure\">08:12</span>"));
        assert!(html.contains("<span class=\"track\">4</span>"));
        assert_eq!(row_count(&html), 1);
        assert!(!html.contains(NO_DEPARTURES));
    }

    #[test]
    fn test_empty_list_shows_placeholder() {
        let html = render_line(&line(), &[], &RenderOptions::default());

        assert!(html.contains(NO_DEPARTURES));
        assert_eq!(row_count(&html), 0);
        assert!(!html.contains("<ul"));
    }

    #[test]
    fn test_caps_rows_and_preserves_order() {
        let labels = ["A", "B", "C", "D", "E", "F", "G", "H"];
        let records: Vec<_> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| record(l, 10 + i as u32, 0, false))
            .collect();

        let html = render_line(&line(), &records, &RenderOptions::default());
        assert_eq!(row_count(&html), 6);

        let positions: Vec<_> = labels[..6]
            .iter()
            .map(|l| html.find(&format!(">{}</span>", l)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!html.contains(">G</span>"));
        assert!(!html.contains(">H</span>"));
    }

    #[test]
    fn test_delay_badge_positive_only() {
        let options = RenderOptions::default();

        let late = render_line(&line(), &[record("K", 12, 3, false)], &options);
        assert!(late.contains("<span class=\"badge delay\">3 min</span>"));

        let on_time = render_line(&line(), &[record("K", 12, 0, false)], &options);
        assert!(!on_time.contains("badge delay"));

        let early = render_line(&line(), &[record("K", 12, -2, false)], &options);
        assert!(!early.contains("badge delay"));
    }

    #[test]
    fn test_delay_badge_signed() {
        let options = RenderOptions {
            delay_badge: DelayBadgePolicy::Signed,
            ..RenderOptions::default()
        };

        let early = render_line(&line(), &[record("K", 12, -2, false)], &options);
        assert!(early.contains("<span class=\"badge delay early\">-2 min</span>"));

        let late = render_line(&line(), &[record("K", 12, 4, false)], &options);
        assert!(late.contains("<span class=\"badge delay\">4 min</span>"));
    }

    #[test]
    fn test_cancelled_hides_delay() {
        let html = render_line(&line(), &[record("K", 12, 5, true)], &RenderOptions::default());

        assert!(html.contains("<li class=\"train-row cancelled\">"));
        assert!(html.contains("<span class=\"badge cancelled\">Cancelled</span>"));
        assert!(!html.contains("badge delay"));
    }

    #[test]
    fn test_escapes_server_text() {
        let mut r = record("<b>K</b>", 12, 0, false);
        r.track = "\"1\"&2".to_string();

        let html = render_line(&line(), &[r], &RenderOptions::default());
        assert!(html.contains("&lt;b&gt;K&lt;/b&gt;"));
        assert!(html.contains("&quot;1&quot;&amp;2"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_error_card() {
        let html = render_line_error(&line());
        assert!(html.contains("line-error"));
        assert!(html.contains(LOAD_FAILED));
        assert_eq!(row_count(&html), 0);
    }

    #[test]
    fn test_page_carries_theme() {
        let page = render_page(&PageView {
            theme: Theme::Light,
            clock: "08:12:00",
            board: "<section></section>\n",
            refresh_secs: 30,
        });

        assert!(page.contains("data-theme=\"light\""));
        assert!(page.contains("content=\"#f8fafc\""));
        assert!(page.contains("content=\"30\""));
        assert!(page.contains("<h1 id=\"time\">08:12:00</h1>"));
        assert!(page.contains("<section></section>"));
    }

    #[test]
    fn test_page_follows_board_stream() {
        let page = render_page(&PageView {
            theme: Theme::Dark,
            clock: "08:12:00",
            board: "",
            refresh_secs: 30,
        });

        assert!(page.contains("new EventSource(\"/board/stream\")"));
        assert!(page.contains("addEventListener(\"board\""));
        assert!(page.contains("getElementById(\"board\").innerHTML"));
        assert!(page.contains("addEventListener(\"clock\""));
        // Without scripts the page falls back to reloading
        assert!(page.contains("<noscript><meta http-equiv=\"refresh\" content=\"30\"></noscript>"));
    }
}
