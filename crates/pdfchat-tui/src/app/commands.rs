use std::path::PathBuf;

use pdfchat_core::{AskOutcome, ControllerError};

use super::{App, InputMode, StatusKind};

/// Long-running work requested by [`App::update`]. The main loop shows the
/// busy overlay, then awaits [`App::run_command`] before reading more input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    UploadPdf(PathBuf),
    Ask(String),
}

impl Command {
    pub fn label(&self) -> &'static str {
        match self {
            Command::UploadPdf(_) => "Extracting text from PDF",
            Command::Ask(_) => "Generating answer",
        }
    }
}

impl App {
    /// Mark `cmd` as in flight so the next draw shows it.
    pub fn begin(&mut self, cmd: &Command) {
        self.busy = Some(cmd.label().to_string());
    }

    pub async fn run_command(&mut self, cmd: Command) {
        match cmd {
            Command::UploadPdf(path) => self.upload_from_path(path).await,
            Command::Ask(question) => self.ask(question).await,
        }
        self.busy = None;
    }

    async fn upload_from_path(&mut self, path: PathBuf) {
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read PDF");
                self.set_status(
                    StatusKind::Error,
                    format!("Could not read {}: {e}", path.display()),
                );
                return;
            }
        };

        match self.controller.upload_pdf(&data) {
            Ok(_) => {
                self.set_status(
                    StatusKind::Success,
                    "PDF uploaded and text extracted successfully!",
                );
            }
            Err(ControllerError::EmptyPdf) => {
                self.set_status(StatusKind::Error, "No text could be extracted from this PDF.");
            }
            Err(e) => {
                self.set_status(StatusKind::Error, format!("Error extracting text from PDF: {e}"));
            }
        }
    }

    async fn ask(&mut self, question: String) {
        match self.controller.ask(&question).await {
            Ok(AskOutcome::Answered { .. }) => {
                self.question.clear();
                self.question_cursor = 0;
                self.scroll_back = 0;
                self.status = None;
                self.sync_sidebar_cursor();
            }
            Ok(AskOutcome::Ignored) => {
                let hint = match self.active_record() {
                    None => "Start a new chat first.",
                    Some(rec) if !rec.has_pdf() => "Upload a PDF before asking.",
                    Some(_) => "Type a question first.",
                };
                self.set_status(StatusKind::Info, hint);
            }
            Err(e) => {
                self.input_mode = InputMode::TextInput;
                self.set_status(StatusKind::Error, format!("Error generating response: {e}"));
            }
        }
    }
}
