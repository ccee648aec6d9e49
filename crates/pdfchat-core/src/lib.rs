use std::path::PathBuf;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;
pub mod controller;
pub mod generator;
pub mod llm;
pub mod store;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend, is_pdf};
pub use controller::{AskOutcome, ControllerError, Selection, SessionController};
pub use generator::{Generator, MAX_CONTEXT_CHARS, UNTITLED_CHAT, truncate_context};
pub use llm::{DEFAULT_API_BASE, DEFAULT_MODEL, LanguageModel, LlmError, OpenAiChat};
pub use store::{ChatHistoryStore, StoreError};

/// One answered question within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// The persisted state of one chat session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Short title, set from the first answered question and never replaced.
    pub title: Option<String>,
    /// Extracted text of the most recently uploaded PDF.
    pub pdf_content: Option<String>,
    #[serde(default)]
    pub history: Vec<QaPair>,
}

impl SessionRecord {
    /// Title to show in lists and headers.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("New Chat")
    }

    /// Whether a PDF with usable text is attached.
    pub fn has_pdf(&self) -> bool {
        self.pdf_content.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Session identifier → record, in creation order.
pub type ChatHistory = IndexMap<String, SessionRecord>;

/// Resolved runtime configuration shared by the binaries.
#[derive(Clone)]
pub struct Config {
    pub history_path: PathBuf,
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub request_timeout: Duration,
    pub server_host: String,
    pub server_port: u16,
    pub max_upload_mb: usize,
    pub theme: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("history_path", &self.history_path)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("max_upload_mb", &self.max_upload_mb)
            .field("theme", &self.theme)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from("chat_history.json"),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(60),
            server_host: "127.0.0.1".to_string(),
            server_port: 8001,
            max_upload_mb: 50,
            theme: "hacker".to_string(),
        }
    }
}

impl Config {
    /// Overlay environment variables on top of the current values.
    ///
    /// `OPENAI_API_KEY`, `OPENAI_API_BASE` and `PDFCHAT_HISTORY_FILE` are read;
    /// empty values are ignored.
    pub fn apply_env(&mut self) {
        if let Some(key) = non_empty_env("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(base) = non_empty_env("OPENAI_API_BASE") {
            self.api_base = base;
        }
        if let Some(path) = non_empty_env("PDFCHAT_HISTORY_FILE") {
            self.history_path = PathBuf::from(path);
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
