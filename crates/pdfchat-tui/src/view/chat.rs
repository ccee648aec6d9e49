use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, InputMode};
use crate::view::wrapped_rows;

/// Active session: document status, conversation, and the question box.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // document
        Constraint::Min(3),    // conversation
        Constraint::Length(3), // question
    ])
    .split(area);

    render_document(f, app, chunks[0]);
    render_conversation(f, app, chunks[1]);
    render_question(f, app, chunks[2]);
}

fn render_document(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = match app.active_record() {
        None => Line::from(Span::styled(
            "Press n to start a new chat, or pick one on the left.",
            Style::default().fg(theme.dim),
        )),
        Some(rec) => match &rec.pdf_content {
            Some(text) => Line::from(vec![
                Span::styled("\u{2713} PDF loaded ", Style::default().fg(theme.success)),
                Span::styled(
                    format!("({} characters). Press o to replace it.", text.chars().count()),
                    Style::default().fg(theme.dim),
                ),
            ]),
            None => Line::from(Span::styled(
                "No PDF yet. Press o to upload one.",
                Style::default().fg(theme.dim),
            )),
        },
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Document ");
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_conversation(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let title = app
        .active_record()
        .map(|r| format!(" {} ", r.display_title()))
        .unwrap_or_else(|| " New Chat ".to_string());

    let mut lines: Vec<Line> = Vec::new();
    let mut plain: Vec<String> = Vec::new();
    if let Some(rec) = app.active_record() {
        for pair in &rec.history {
            let q = format!("Q: {}", pair.question);
            lines.push(Line::from(Span::styled(
                q.clone(),
                Style::default()
                    .fg(theme.question)
                    .add_modifier(Modifier::BOLD),
            )));
            plain.push(q);

            let a = format!("A: {}", pair.answer);
            for text in a.split('\n') {
                lines.push(Line::from(Span::styled(
                    text.to_string(),
                    Style::default().fg(theme.answer),
                )));
            }
            plain.push(a);

            lines.push(Line::from(""));
            plain.push(String::new());
        }
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let total: usize = plain.iter().map(|l| wrapped_rows(l, inner_width)).sum();
    let scroll = total
        .saturating_sub(inner_height)
        .saturating_sub(app.scroll_back);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(title);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}

fn render_question(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let editing = app.input_mode == InputMode::TextInput;
    let inner_width = area.width.saturating_sub(2) as usize;

    // Keep the cursor visible by scrolling long input horizontally.
    let before = app.question[..app.question_cursor].chars().count();
    let offset = before.saturating_sub(inner_width.saturating_sub(1));
    let visible: String = app
        .question
        .chars()
        .skip(offset)
        .take(inner_width)
        .collect();

    let content = if visible.is_empty() && !editing {
        Span::styled("Ask a question about your PDF", Style::default().fg(theme.dim))
    } else {
        Span::styled(visible, Style::default().fg(theme.text))
    };

    let border = if editing {
        theme.focused_border_style()
    } else {
        theme.border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Question ");
    f.render_widget(Paragraph::new(Line::from(content)).block(block), area);

    if editing {
        let x = area.x + 1 + (before - offset) as u16;
        f.set_cursor_position(Position::new(x, area.y + 1));
    }
}
