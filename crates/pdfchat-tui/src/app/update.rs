use super::{App, Command, InputMode, Screen, StatusKind};
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns work the main loop has
    /// to await before the next action.
    pub fn update(&mut self, action: Action) -> Option<Command> {
        // Housekeeping runs under every modal.
        match action {
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return None;
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(8);
                return None;
            }
            Action::ForceQuit => {
                self.should_quit = true;
                return None;
            }
            _ => {}
        }

        if self.busy.is_some() {
            return None;
        }

        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => self.should_quit = true,
                Action::NavigateBack | Action::CancelInput => self.confirm_quit = false,
                _ => {}
            }
            return None;
        }

        // Delete confirmation modal: y/Enter deletes, anything else cancels
        if let Some(id) = self.confirm_delete.take() {
            if matches!(action, Action::Confirm | Action::DrillIn) {
                self.delete_session(&id);
            }
            return None;
        }

        if self.show_help {
            self.show_help = false;
            return None;
        }

        match self.screen {
            Screen::FilePicker => self.handle_file_picker_action(action),
            Screen::Chat => match self.input_mode {
                InputMode::TextInput => self.handle_text_input(action),
                InputMode::Normal => self.handle_chat_action(action),
            },
        }
    }

    fn handle_chat_action(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::MoveDown => {
                let max = self.sidebar_len().saturating_sub(1);
                self.select_row((self.sidebar_cursor + 1).min(max));
            }
            Action::MoveUp => {
                self.select_row(self.sidebar_cursor.saturating_sub(1));
            }
            Action::GoTop => {
                self.select_row(0);
            }
            Action::GoBottom => {
                self.select_row(self.sidebar_len().saturating_sub(1));
            }
            Action::PageUp => {
                self.scroll_back += self.page();
            }
            Action::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(self.page());
            }
            Action::DrillIn => {
                if self.controller.active_id().is_some() {
                    self.input_mode = InputMode::TextInput;
                } else {
                    self.start_new_chat();
                }
            }
            Action::NewChat => {
                self.start_new_chat();
            }
            Action::DeleteChat => match self.controller.active_id() {
                Some(id) => self.confirm_delete = Some(id.to_string()),
                None => self.set_status(StatusKind::Info, "Select a chat to delete."),
            },
            Action::OpenFilePicker => {
                if self.controller.active_id().is_some() {
                    self.file_picker.refresh_entries();
                    self.screen = Screen::FilePicker;
                } else {
                    self.set_status(StatusKind::Info, "Start a new chat before uploading a PDF.");
                }
            }
            Action::FocusQuestion => {
                if self.controller.active_id().is_some() {
                    self.input_mode = InputMode::TextInput;
                } else {
                    self.set_status(StatusKind::Info, "Start a new chat first.");
                }
            }
            Action::NavigateBack => {
                self.status = None;
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            _ => {}
        }
        None
    }

    fn handle_text_input(&mut self, action: Action) -> Option<Command> {
        let buf = &mut self.question;
        let cur = &mut self.question_cursor;
        match action {
            Action::TextInput(ch) => {
                buf.insert(*cur, ch);
                *cur += ch.len_utf8();
            }
            Action::Backspace => {
                if *cur > 0 {
                    let prev = buf[..*cur]
                        .char_indices()
                        .next_back()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    buf.drain(prev..*cur);
                    *cur = prev;
                }
            }
            Action::DeleteForward => {
                if *cur < buf.len() {
                    let next = *cur + buf[*cur..].chars().next().map(|c| c.len_utf8()).unwrap_or(0);
                    buf.drain(*cur..next);
                }
            }
            Action::CursorLeft => {
                *cur = buf[..*cur]
                    .char_indices()
                    .next_back()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
            }
            Action::CursorRight => {
                if *cur < buf.len() {
                    *cur += buf[*cur..].chars().next().map(|c| c.len_utf8()).unwrap_or(0);
                }
            }
            Action::CursorHome => *cur = 0,
            Action::CursorEnd => *cur = buf.len(),
            Action::PageUp => {
                self.scroll_back += self.page();
            }
            Action::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(self.page());
            }
            Action::CancelInput => {
                self.input_mode = InputMode::Normal;
            }
            Action::Submit => {
                let question = self.question.trim();
                if question.is_empty() {
                    self.set_status(StatusKind::Info, "Type a question first.");
                    return None;
                }
                return Some(Command::Ask(question.to_string()));
            }
            Action::Quit => {
                self.confirm_quit = true;
            }
            _ => {}
        }
        None
    }

    /// Handle input while on the file picker screen.
    fn handle_file_picker_action(&mut self, action: Action) -> Option<Command> {
        let picker = &mut self.file_picker;
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::NavigateBack => {
                self.screen = Screen::Chat;
            }
            Action::MoveDown => {
                let max = picker.entries.len().saturating_sub(1);
                if picker.cursor < max {
                    picker.cursor += 1;
                }
            }
            Action::MoveUp => {
                picker.cursor = picker.cursor.saturating_sub(1);
            }
            Action::PageDown => {
                let max = picker.entries.len().saturating_sub(1);
                picker.cursor = (picker.cursor + self.visible_rows.max(1)).min(max);
            }
            Action::PageUp => {
                picker.cursor = picker.cursor.saturating_sub(self.visible_rows.max(1));
            }
            Action::GoTop => {
                picker.cursor = 0;
            }
            Action::GoBottom => {
                picker.cursor = picker.entries.len().saturating_sub(1);
            }
            Action::Backspace => {
                picker.go_up();
            }
            Action::DrillIn => {
                if picker.enter_directory() {
                    return None;
                }
                if let Some(entry) = picker.current() {
                    let path = entry.path.clone();
                    self.screen = Screen::Chat;
                    return Some(Command::UploadPdf(path));
                }
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            _ => {}
        }
        None
    }

    /// Move the sidebar cursor and make that row the active selection.
    fn select_row(&mut self, row: usize) {
        self.sidebar_cursor = row;
        let id = row
            .checked_sub(1)
            .and_then(|i| self.controller.history().get_index(i))
            .map(|(id, _)| id.clone());
        match id {
            Some(id) => {
                if let Err(e) = self.controller.select(&id) {
                    self.set_status(StatusKind::Error, e.to_string());
                    return;
                }
            }
            None => self.controller.select_new_chat(),
        }
        self.scroll_back = 0;
        self.status = None;
    }

    fn start_new_chat(&mut self) {
        self.controller.select_new_chat();
        self.controller.create();
        self.sync_sidebar_cursor();
        self.scroll_back = 0;
        self.question.clear();
        self.question_cursor = 0;
        self.set_status(StatusKind::Success, "New chat started. Upload a PDF to begin.");
    }

    fn delete_session(&mut self, id: &str) {
        match self.controller.delete(id) {
            Ok(rec) => {
                self.sidebar_cursor = 0;
                self.scroll_back = 0;
                self.input_mode = InputMode::Normal;
                self.set_status(
                    StatusKind::Success,
                    format!("Deleted \"{}\".", rec.display_title()),
                );
            }
            Err(e) => self.set_status(StatusKind::Error, e.to_string()),
        }
    }

    fn page(&self) -> usize {
        (self.visible_rows / 2).max(1)
    }
}
