use std::sync::Arc;

use crate::llm::{LanguageModel, LlmError};

/// Characters of PDF text sent along with a question. Anything past this is
/// dropped.
pub const MAX_CONTEXT_CHARS: usize = 4000;

/// Title used when title generation fails.
pub const UNTITLED_CHAT: &str = "Untitled Chat";

const ANSWER_SYSTEM_PROMPT: &str =
    "You are a helpful assistant answering questions based on PDF content.";
const TITLE_SYSTEM_PROMPT: &str = "Create a concise and descriptive title for this input.";

/// First `MAX_CONTEXT_CHARS` characters of `context`, on a char boundary.
pub fn truncate_context(context: &str) -> &str {
    match context.char_indices().nth(MAX_CONTEXT_CHARS) {
        Some((idx, _)) => &context[..idx],
        None => context,
    }
}

/// Answer and title generation on top of a [`LanguageModel`].
#[derive(Clone)]
pub struct Generator {
    model: Arc<dyn LanguageModel>,
}

impl Generator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Answer `question` using the (truncated) PDF text as context.
    pub async fn answer(&self, context: &str, question: &str) -> Result<String, LlmError> {
        let user = format!(
            "Context: {}\n\nQuestion: {}",
            truncate_context(context),
            question
        );
        self.model.complete(ANSWER_SYSTEM_PROMPT, &user).await
    }

    /// Summarize `question` into a short session title.
    ///
    /// A reply that is blank after trimming is [`LlmError::MissingContent`].
    pub async fn title(&self, question: &str) -> Result<String, LlmError> {
        let title = self.model.complete(TITLE_SYSTEM_PROMPT, question).await?;
        let title = title.trim();
        if title.is_empty() {
            return Err(LlmError::MissingContent);
        }
        Ok(title.to_string())
    }
}
