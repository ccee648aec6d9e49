use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::App;

/// Render the file picker screen into the given area.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let picker = &app.file_picker;

    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(1), // current dir
        Constraint::Min(5),    // file list
        Constraint::Length(1), // status
        Constraint::Length(1), // footer
    ])
    .split(area);

    let target = app
        .active_record()
        .map(|r| r.display_title().to_string())
        .unwrap_or_default();
    let header = Line::from(vec![
        Span::styled(" Files ", theme.header_style()),
        Span::styled(
            format!(" > Select a PDF for \"{target}\""),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let dir_line = Line::from(vec![
        Span::styled(" \u{1F4C1} ", Style::default().fg(theme.active)),
        Span::styled(
            picker.current_dir.display().to_string(),
            Style::default().fg(theme.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(dir_line), chunks[1]);

    let items: Vec<ListItem> = picker
        .entries
        .iter()
        .map(|entry| {
            let (icon, style) = if entry.is_dir {
                ("\u{1F4C1} ", Style::default().fg(theme.active))
            } else {
                ("\u{1F4C4} ", Style::default().fg(theme.text))
            };
            ListItem::new(Line::from(vec![
                Span::raw(" "),
                Span::styled(icon, style),
                Span::styled(entry.name.clone(), style),
            ]))
        })
        .collect();

    let list = if items.is_empty() {
        List::new(vec![ListItem::new(Span::styled(
            "  No PDFs or folders here",
            Style::default().fg(theme.dim),
        ))])
    } else {
        List::new(items)
    };
    let list = list
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.focused_border_style()),
        )
        .highlight_style(theme.highlight_style());

    let mut state = ListState::default();
    if !picker.entries.is_empty() {
        state.select(Some(picker.cursor));
    }
    f.render_stateful_widget(list, chunks[2], &mut state);

    crate::view::render_status(f, app, chunks[3]);

    let footer = Line::from(Span::styled(
        " j/k:move  Enter:open/upload  Backspace:parent  Esc:back  ?:help",
        theme.footer_style(),
    ));
    f.render_widget(Paragraph::new(footer), chunks[4]);
}
