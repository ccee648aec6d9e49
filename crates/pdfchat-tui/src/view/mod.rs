pub mod chat;
pub mod confirm;
pub mod file_picker;
pub mod help;
pub mod sidebar;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, InputMode};

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Rows `text` occupies when wrapped to `width` columns, counting each char
/// as one column.
pub fn wrapped_rows(text: &str, width: usize) -> usize {
    let width = width.max(1);
    text.split('\n')
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum()
}

pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let path = app.controller.store().path().display().to_string();
    let line = Line::from(vec![
        Span::styled(" pdfchat ", theme.header_style()),
        Span::styled(format!(" {path}"), Style::default().fg(theme.dim)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

pub fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let Some(status) = &app.status else {
        return;
    };
    let line = Line::from(Span::styled(
        format!(" {}", truncate(&status.text, area.width.saturating_sub(1) as usize)),
        Style::default().fg(app.theme.status_color(status.kind)),
    ));
    f.render_widget(Paragraph::new(line), area);
}

pub fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints = match app.input_mode {
        InputMode::TextInput => " Enter:ask  Esc:done typing  PgUp/PgDn:scroll",
        InputMode::Normal => {
            " j/k:chats  n:new chat  o:upload PDF  i:ask  d:delete  ?:help  q:quit"
        }
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(hints, app.theme.footer_style()))),
        area,
    );
}
