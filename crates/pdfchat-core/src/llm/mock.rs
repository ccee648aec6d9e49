//! Mock language model for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use super::{LanguageModel, LlmError};

/// One recorded call to [`MockModel::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
}

/// A hand-rolled mock implementing [`LanguageModel`].
///
/// Returns responses in order, repeating the last one once the sequence is
/// exhausted, and records every request it receives.
pub struct MockModel {
    responses: Mutex<Vec<Result<String, LlmError>>>,
    fallback: Result<String, LlmError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockModel {
    /// Always reply with `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_sequence(vec![Ok(text.into())])
    }

    /// Always fail with `error`.
    pub fn failing(error: LlmError) -> Self {
        Self::with_sequence(vec![Err(error)])
    }

    /// Reply with each response in turn, repeating the last one.
    pub fn with_sequence(mut responses: Vec<Result<String, LlmError>>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        // Reversed so pop() yields the front.
        responses.reverse();
        let fallback = responses[0].clone();
        Self {
            responses: Mutex::new(responses),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl LanguageModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            user: user.to_string(),
        });
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| self.fallback.clone());
        Box::pin(async move { response })
    }
}
