use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::app::{App, InputMode, Screen};
use crate::view::truncate;

/// Session list. Row 0 is always "New Chat".
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = app
        .sidebar_entries()
        .into_iter()
        .enumerate()
        .map(|(i, (label, active))| {
            let marker = if active { "\u{25B8} " } else { "  " };
            let style = if i == 0 {
                Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC)
            } else if active {
                Style::default().fg(theme.active)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.active)),
                Span::styled(truncate(&label, width.saturating_sub(2)), style),
            ]))
        })
        .collect();

    let focused = app.screen == Screen::Chat && app.input_mode == InputMode::Normal;
    let border = if focused {
        theme.focused_border_style()
    } else {
        theme.border_style()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" Chats "),
        )
        .highlight_style(theme.highlight_style());

    let mut state = ListState::default();
    state.select(Some(app.sidebar_cursor));
    f.render_stateful_widget(list, area, &mut state);
}
