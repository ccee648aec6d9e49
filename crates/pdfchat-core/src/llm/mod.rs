//! Chat-completion language-model backends.

mod openai;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use openai::OpenAiChat;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Model used for both answers and titles.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Base URL of the OpenAI-compatible API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("no API key configured (set OPENAI_API_KEY)")]
    MissingApiKey,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("response contained no completion text")]
    MissingContent,
}

/// A backend that performs one chat-completion round-trip.
pub trait LanguageModel: Send + Sync {
    /// Provider name for logs (e.g. "openai").
    fn name(&self) -> &str;

    /// Send a fixed system message and one user message, return the first
    /// completion's text.
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>>;
}
