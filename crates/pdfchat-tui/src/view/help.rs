use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::confirm::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let popup = centered_rect(60, 30, f.area());

    let lines = vec![
        Line::from(Span::styled(" Keyboard Shortcuts ", theme.header_style())),
        Line::from(""),
        section_header("Chats", theme),
        key_line("j / \u{2193}", "Next chat", theme),
        key_line("k / \u{2191}", "Previous chat", theme),
        key_line("g / G", "First / last chat", theme),
        key_line("n", "Start a new chat", theme),
        key_line("Enter", "Ask (or start a chat on New Chat)", theme),
        key_line("d", "Delete the selected chat", theme),
        Line::from(""),
        section_header("Document & Questions", theme),
        key_line("o / u", "Upload a PDF into this chat", theme),
        key_line("i / Tab", "Type a question", theme),
        key_line("Enter", "Send the question", theme),
        key_line("Esc", "Stop typing", theme),
        key_line("PgUp / PgDn", "Scroll the conversation", theme),
        Line::from(""),
        section_header("File Picker", theme),
        key_line("Enter", "Open folder / upload PDF", theme),
        key_line("Backspace", "Parent folder", theme),
        key_line("Esc", "Back to chat", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q", "Quit", theme),
        key_line("Ctrl+c", "Force quit", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<14}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
