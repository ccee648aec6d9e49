use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::App;
use crate::theme::Theme;
use crate::view::{spinner_char, truncate};

pub fn render_quit(f: &mut Frame, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Quit pdfchat?",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("q", Style::default().fg(theme.active).add_modifier(Modifier::BOLD)),
            Span::styled(" quit   ", Style::default().fg(theme.dim)),
            Span::styled("Esc", Style::default().fg(theme.active).add_modifier(Modifier::BOLD)),
            Span::styled(" cancel", Style::default().fg(theme.dim)),
        ]),
    ];
    popup(f, theme, " Quit ", lines, 34, 7);
}

pub fn render_delete(f: &mut Frame, theme: &Theme, title: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Delete \"{}\"?", truncate(title, 36)),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Its PDF text and history are removed.",
            Style::default().fg(theme.dim),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
            Span::styled(" delete   ", Style::default().fg(theme.dim)),
            Span::styled("any key", Style::default().fg(theme.active).add_modifier(Modifier::BOLD)),
            Span::styled(" cancel", Style::default().fg(theme.dim)),
        ]),
    ];
    popup(f, theme, " Delete Chat ", lines, 48, 8);
}

pub fn render_busy(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let label = app.busy.as_deref().unwrap_or_default();
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{} ", spinner_char(app.tick)),
                Style::default().fg(theme.spinner),
            ),
            Span::styled(format!("{label}\u{2026}"), Style::default().fg(theme.text)),
        ]),
    ];
    popup(f, theme, " Working ", lines, 40, 5);
}

fn popup(f: &mut Frame, theme: &Theme, title: &str, lines: Vec<Line>, width: u16, height: u16) {
    let area = centered_rect(width, height, f.area());
    let paragraph = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(title),
        );
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}
