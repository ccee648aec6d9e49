mod commands;
mod update;


use std::path::PathBuf;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use pdfchat_core::{SessionController, SessionRecord};

use crate::theme::Theme;

pub use commands::Command;

/// Which top-level screen is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Chat,
    FilePicker,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the question box.
    TextInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One-line message shown above the footer until the next action replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

/// State for the file picker screen.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    /// Current directory being browsed.
    pub current_dir: PathBuf,
    /// Entries in the current directory (dirs first, then PDFs).
    pub entries: Vec<FileEntry>,
    pub cursor: usize,
}

#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

impl FilePickerState {
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new_in(current_dir)
    }

    pub fn new_in(dir: impl Into<PathBuf>) -> Self {
        let mut state = Self {
            current_dir: dir.into(),
            entries: Vec::new(),
            cursor: 0,
        };
        state.refresh_entries();
        state
    }

    /// Re-read the current directory. Only directories and `.pdf` files are
    /// listed; hidden entries are skipped.
    pub fn refresh_entries(&mut self) {
        let mut entries = Vec::new();

        if let Some(parent) = self.current_dir.parent() {
            entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
            });
        }

        match std::fs::read_dir(&self.current_dir) {
            Ok(read_dir) => {
                let mut dirs = Vec::new();
                let mut files = Vec::new();

                for entry in read_dir.flatten() {
                    let path = entry.path();
                    let name = entry.file_name().to_string_lossy().to_string();
                    if name.starts_with('.') {
                        continue;
                    }
                    if path.is_dir() {
                        dirs.push(FileEntry {
                            name,
                            path,
                            is_dir: true,
                        });
                    } else if has_pdf_extension(&path) {
                        files.push(FileEntry {
                            name,
                            path,
                            is_dir: false,
                        });
                    }
                }

                dirs.sort_by_key(|e| e.name.to_lowercase());
                files.sort_by_key(|e| e.name.to_lowercase());
                entries.extend(dirs);
                entries.extend(files);
            }
            Err(e) => {
                tracing::warn!(dir = %self.current_dir.display(), error = %e, "cannot list directory");
            }
        }

        self.entries = entries;
        self.cursor = 0;
    }

    pub fn current(&self) -> Option<&FileEntry> {
        self.entries.get(self.cursor)
    }

    /// Enter the directory at cursor, or return false if it is a file.
    pub fn enter_directory(&mut self) -> bool {
        let path = match self.current() {
            Some(entry) if entry.is_dir => entry.path.clone(),
            _ => return false,
        };
        self.current_dir = std::fs::canonicalize(&path).unwrap_or(path);
        self.refresh_entries();
        true
    }

    pub fn go_up(&mut self) {
        if let Some(parent) = self.current_dir.parent() {
            self.current_dir = parent.to_path_buf();
            self.refresh_entries();
        }
    }
}

impl Default for FilePickerState {
    fn default() -> Self {
        Self::new()
    }
}

fn has_pdf_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// All TUI state. Chat data lives in the controller; everything else here is
/// view state.
pub struct App {
    pub controller: SessionController,
    pub screen: Screen,
    pub input_mode: InputMode,
    /// Sidebar row under the cursor. Row 0 is "New Chat", row `n` is the
    /// `n`th stored session.
    pub sidebar_cursor: usize,
    pub question: String,
    /// Byte offset into `question`, always on a char boundary.
    pub question_cursor: usize,
    /// Rows scrolled up from the bottom of the conversation; 0 follows the tail.
    pub scroll_back: usize,
    pub file_picker: FilePickerState,
    /// Session waiting for delete confirmation.
    pub confirm_delete: Option<String>,
    pub confirm_quit: bool,
    pub show_help: bool,
    pub status: Option<StatusMessage>,
    /// Label of the operation currently awaited by the main loop.
    pub busy: Option<String>,
    pub tick: usize,
    pub theme: Theme,
    pub should_quit: bool,
    pub visible_rows: usize,
}

impl App {
    pub fn new(controller: SessionController, theme: Theme) -> Self {
        Self {
            controller,
            screen: Screen::Chat,
            input_mode: InputMode::Normal,
            sidebar_cursor: 0,
            question: String::new(),
            question_cursor: 0,
            scroll_back: 0,
            file_picker: FilePickerState::new(),
            confirm_delete: None,
            confirm_quit: false,
            show_help: false,
            status: None,
            busy: None,
            tick: 0,
            theme,
            should_quit: false,
            visible_rows: 20,
        }
    }

    /// Number of sidebar rows including "New Chat".
    pub fn sidebar_len(&self) -> usize {
        self.controller.history().len() + 1
    }

    /// Sidebar rows as (label, is_active) pairs.
    pub fn sidebar_entries(&self) -> Vec<(String, bool)> {
        let active = self.controller.active_id();
        let mut rows = vec![("New Chat".to_string(), active.is_none())];
        rows.extend(
            self.controller
                .history()
                .iter()
                .map(|(id, rec)| (rec.display_title().to_string(), Some(id.as_str()) == active)),
        );
        rows
    }

    pub fn active_record(&self) -> Option<&SessionRecord> {
        self.controller.active()
    }

    pub(crate) fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    /// Point the sidebar cursor at the controller's current selection.
    pub(crate) fn sync_sidebar_cursor(&mut self) {
        self.sidebar_cursor = match self.controller.active_id() {
            None => 0,
            Some(id) => self
                .controller
                .history()
                .get_index_of(id)
                .map(|i| i + 1)
                .unwrap_or(0),
        };
    }

    pub fn view(&self, f: &mut Frame) {
        let area = f.area();

        if self.screen == Screen::FilePicker {
            crate::view::file_picker::render_in(f, self, area);
        } else {
            let chunks = Layout::vertical([
                Constraint::Length(1), // header
                Constraint::Min(5),    // body
                Constraint::Length(1), // status
                Constraint::Length(1), // footer
            ])
            .split(area);

            crate::view::render_header(f, self, chunks[0]);

            let body = Layout::horizontal([Constraint::Length(32), Constraint::Min(20)])
                .split(chunks[1]);
            crate::view::sidebar::render_in(f, self, body[0]);
            crate::view::chat::render_in(f, self, body[1]);

            crate::view::render_status(f, self, chunks[2]);
            crate::view::render_footer(f, self, chunks[3]);
        }

        if self.busy.is_some() {
            crate::view::confirm::render_busy(f, self);
        } else if let Some(id) = &self.confirm_delete {
            let title = self
                .controller
                .history()
                .get(id)
                .map(SessionRecord::display_title)
                .unwrap_or(id.as_str());
            crate::view::confirm::render_delete(f, &self.theme, title);
        } else if self.confirm_quit {
            crate::view::confirm::render_quit(f, &self.theme);
        } else if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}
