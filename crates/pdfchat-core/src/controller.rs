//! Session lifecycle: create, select, delete, upload a PDF, ask questions.
//!
//! The controller owns the in-memory [`ChatHistory`] and writes the whole
//! mapping back through its [`ChatHistoryStore`] after every mutation.

use std::sync::Arc;

use thiserror::Error;

use crate::backend::{BackendError, PdfBackend};
use crate::generator::{Generator, UNTITLED_CHAT};
use crate::llm::LlmError;
use crate::store::ChatHistoryStore;
use crate::{ChatHistory, QaPair, SessionRecord};

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("no session selected")]
    NoSessionSelected,
    #[error("unknown session: {0}")]
    UnknownSession(String),
    #[error("PDF extraction error: {0}")]
    Extraction(#[from] BackendError),
    #[error("PDF contains no extractable text")]
    EmptyPdf,
    #[error("response generation error: {0}")]
    Answer(#[from] LlmError),
}

/// Which session the user is looking at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// The synthetic "New Chat" entry; no record backs it.
    #[default]
    NewChat,
    Session(String),
}

/// Result of [`SessionController::ask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    /// Preconditions not met (no session, empty question, no PDF). Nothing
    /// changed.
    Ignored,
    Answered {
        answer: String,
        /// True when this answer also set the session title.
        title_generated: bool,
    },
}

pub struct SessionController {
    store: ChatHistoryStore,
    history: ChatHistory,
    generator: Generator,
    pdf: Arc<dyn PdfBackend>,
    selection: Selection,
}

impl SessionController {
    /// Load the mapping from `store` and start on "New Chat".
    pub fn new(store: ChatHistoryStore, generator: Generator, pdf: Arc<dyn PdfBackend>) -> Self {
        let history = store.load();
        tracing::info!(
            path = %store.path().display(),
            sessions = history.len(),
            model = generator.model_name(),
            "session controller ready"
        );
        Self {
            store,
            history,
            generator,
            pdf,
            selection: Selection::NewChat,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active_id(&self) -> Option<&str> {
        match &self.selection {
            Selection::NewChat => None,
            Selection::Session(id) => Some(id),
        }
    }

    /// Record of the selected session, if any.
    pub fn active(&self) -> Option<&SessionRecord> {
        self.active_id().and_then(|id| self.history.get(id))
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn session_ids(&self) -> impl Iterator<Item = &str> {
        self.history.keys().map(String::as_str)
    }

    pub fn store(&self) -> &ChatHistoryStore {
        &self.store
    }

    /// Start a new empty session and select it.
    pub fn create(&mut self) -> String {
        let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S").to_string();
        let id = next_session_id(&self.history, &timestamp);
        self.history.insert(id.clone(), SessionRecord::default());
        self.persist();
        tracing::info!(session = %id, "created session");
        self.selection = Selection::Session(id.clone());
        id
    }

    pub fn select(&mut self, id: &str) -> Result<(), ControllerError> {
        if !self.history.contains_key(id) {
            return Err(ControllerError::UnknownSession(id.to_string()));
        }
        self.selection = Selection::Session(id.to_string());
        Ok(())
    }

    pub fn select_new_chat(&mut self) {
        self.selection = Selection::NewChat;
    }

    /// Remove a session, persist the removal, and go back to "New Chat".
    pub fn delete(&mut self, id: &str) -> Result<SessionRecord, ControllerError> {
        let removed = self
            .history
            .shift_remove(id)
            .ok_or_else(|| ControllerError::UnknownSession(id.to_string()))?;
        self.persist();
        self.selection = Selection::NewChat;
        tracing::info!(session = %id, "deleted session");
        Ok(removed)
    }

    /// Extract text from `data` and attach it to the selected session.
    ///
    /// Returns the number of characters extracted. On failure the session is
    /// left as it was and nothing is written.
    pub fn upload_pdf(&mut self, data: &[u8]) -> Result<usize, ControllerError> {
        let id = self
            .active_id()
            .ok_or(ControllerError::NoSessionSelected)?
            .to_string();

        let text = self.pdf.extract_text(data).inspect_err(|e| {
            tracing::warn!(session = %id, error = %e, "PDF extraction failed");
        })?;
        if text.is_empty() {
            return Err(ControllerError::EmptyPdf);
        }

        let chars = text.chars().count();
        let record = self
            .history
            .get_mut(&id)
            .ok_or_else(|| ControllerError::UnknownSession(id.clone()))?;
        record.pdf_content = Some(text);
        self.persist();
        tracing::info!(session = %id, chars, "attached PDF text");
        Ok(chars)
    }

    /// Answer `question` against the selected session's PDF.
    ///
    /// The first successful answer in a session also generates its title.
    pub async fn ask(&mut self, question: &str) -> Result<AskOutcome, ControllerError> {
        let Some(id) = self.active_id().map(str::to_string) else {
            return Ok(AskOutcome::Ignored);
        };
        let Some(record) = self.history.get(&id) else {
            return Ok(AskOutcome::Ignored);
        };
        if question.is_empty() || !record.has_pdf() {
            return Ok(AskOutcome::Ignored);
        }
        let context = record.pdf_content.clone().unwrap_or_default();
        let needs_title = record.title.is_none();

        let answer = self.generator.answer(&context, question).await.inspect_err(|e| {
            tracing::warn!(session = %id, error = %e, "answer generation failed");
        })?;

        let title = if needs_title {
            Some(match self.generator.title(question).await {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!(session = %id, error = %e, "error generating chat title");
                    UNTITLED_CHAT.to_string()
                }
            })
        } else {
            None
        };

        let record = self
            .history
            .get_mut(&id)
            .ok_or_else(|| ControllerError::UnknownSession(id.clone()))?;
        record.history.push(QaPair {
            question: question.to_string(),
            answer: answer.clone(),
        });
        let title_generated = title.is_some();
        if let Some(title) = title
            && record.title.is_none()
        {
            record.title = Some(title);
        }
        self.persist();

        Ok(AskOutcome::Answered {
            answer,
            title_generated,
        })
    }

    /// Write the whole mapping. Failures are logged; the in-memory state stays
    /// authoritative and the next save rewrites everything.
    fn persist(&self) {
        if let Err(e) = self.store.save(&self.history) {
            tracing::error!(error = %e, "error saving chat history");
        }
    }
}

/// `session_<count>_<timestamp>`, bumping the count past any existing key.
fn next_session_id(history: &ChatHistory, timestamp: &str) -> String {
    let mut n = history.len() + 1;
    loop {
        let id = format!("session_{}_{}", n, timestamp);
        if !history.contains_key(&id) {
            return id;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockPdf;
    use crate::llm::mock::MockModel;

    fn controller_with(model: MockModel, pdf: MockPdf) -> (SessionController, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ChatHistoryStore::new(dir.path().join("chat_history.json"));
        let controller =
            SessionController::new(store, Generator::new(Arc::new(model)), Arc::new(pdf));
        (controller, dir)
    }

    #[test]
    fn session_id_uses_count_and_timestamp() {
        let history = ChatHistory::new();
        assert_eq!(
            next_session_id(&history, "20240101120000"),
            "session_1_20240101120000"
        );
    }

    #[test]
    fn session_id_skips_taken_keys() {
        let mut history = ChatHistory::new();
        history.insert("session_2_20240101120000".into(), SessionRecord::default());
        // One session left after a deletion, same second as the survivor.
        assert_eq!(
            next_session_id(&history, "20240101120000"),
            "session_3_20240101120000"
        );
    }

    #[test]
    fn starts_on_new_chat() {
        let (controller, _dir) = controller_with(MockModel::new("a"), MockPdf::returning("t"));
        assert_eq!(controller.selection(), &Selection::NewChat);
        assert!(controller.active().is_none());
    }

    #[test]
    fn create_persists_empty_record_and_selects_it() {
        let (mut controller, _dir) = controller_with(MockModel::new("a"), MockPdf::returning("t"));
        let id = controller.create();

        assert!(id.starts_with("session_1_"));
        assert_eq!(controller.active_id(), Some(id.as_str()));
        assert_eq!(controller.active(), Some(&SessionRecord::default()));
        let on_disk = controller.store().try_load().unwrap();
        assert_eq!(on_disk.get(&id), Some(&SessionRecord::default()));
    }

    #[test]
    fn select_unknown_session_errors() {
        let (mut controller, _dir) = controller_with(MockModel::new("a"), MockPdf::returning("t"));
        assert!(matches!(
            controller.select("session_9_x"),
            Err(ControllerError::UnknownSession(_))
        ));
        assert_eq!(controller.selection(), &Selection::NewChat);
    }

    #[test]
    fn upload_requires_a_session() {
        let (mut controller, _dir) = controller_with(MockModel::new("a"), MockPdf::returning("t"));
        assert!(matches!(
            controller.upload_pdf(b"%PDF-"),
            Err(ControllerError::NoSessionSelected)
        ));
    }

    #[test]
    fn failed_extraction_leaves_record_untouched() {
        let (mut controller, _dir) =
            controller_with(MockModel::new("a"), MockPdf::failing("broken xref"));
        let id = controller.create();

        let err = controller.upload_pdf(b"junk").unwrap_err();
        assert!(matches!(err, ControllerError::Extraction(_)));
        assert_eq!(controller.history()[&id].pdf_content, None);
    }

    #[test]
    fn empty_extraction_is_rejected() {
        let (mut controller, _dir) = controller_with(MockModel::new("a"), MockPdf::returning(""));
        let id = controller.create();

        assert!(matches!(
            controller.upload_pdf(b"%PDF-"),
            Err(ControllerError::EmptyPdf)
        ));
        assert_eq!(controller.history()[&id].pdf_content, None);
    }

    #[test]
    fn upload_replaces_previous_content() {
        let (mut controller, _dir) =
            controller_with(MockModel::new("a"), MockPdf::returning("second"));
        let id = controller.create();
        controller.history.get_mut(&id).unwrap().pdf_content = Some("first".into());

        assert_eq!(controller.upload_pdf(b"%PDF-").unwrap(), 6);
        assert_eq!(controller.active().unwrap().pdf_content.as_deref(), Some("second"));
        let on_disk = controller.store().try_load().unwrap();
        assert_eq!(on_disk[&id].pdf_content.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn ask_without_pdf_is_ignored_and_not_persisted() {
        let model = MockModel::new("answer");
        let (mut controller, _dir) = controller_with(model, MockPdf::returning("t"));
        let id = controller.create();
        let before = std::fs::read_to_string(controller.store().path()).unwrap();

        for question in ["", "What grew?"] {
            assert_eq!(controller.ask(question).await.unwrap(), AskOutcome::Ignored);
        }

        assert!(controller.history()[&id].history.is_empty());
        let after = std::fs::read_to_string(controller.store().path()).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn ask_on_new_chat_is_ignored() {
        let (mut controller, _dir) = controller_with(MockModel::new("a"), MockPdf::returning("t"));
        assert_eq!(controller.ask("anything").await.unwrap(), AskOutcome::Ignored);
        assert!(controller.history().is_empty());
    }

    #[tokio::test]
    async fn empty_question_is_ignored_even_with_pdf() {
        let (mut controller, _dir) = controller_with(MockModel::new("a"), MockPdf::returning("t"));
        controller.create();
        controller.upload_pdf(b"%PDF-").unwrap();

        assert_eq!(controller.ask("").await.unwrap(), AskOutcome::Ignored);
        assert!(controller.active().unwrap().history.is_empty());
    }

    #[tokio::test]
    async fn answer_failure_appends_nothing() {
        let model = MockModel::failing(LlmError::Network("connection refused".into()));
        let (mut controller, _dir) = controller_with(model, MockPdf::returning("text"));
        controller.create();
        controller.upload_pdf(b"%PDF-").unwrap();

        let err = controller.ask("What?").await.unwrap_err();
        assert!(matches!(err, ControllerError::Answer(LlmError::Network(_))));
        let record = controller.active().unwrap();
        assert!(record.history.is_empty());
        assert_eq!(record.title, None);
    }

    #[tokio::test]
    async fn title_failure_falls_back_to_untitled() {
        let model = MockModel::with_sequence(vec![
            Ok("It grew.".into()),
            Err(LlmError::Api {
                status: 500,
                body: "oops".into(),
            }),
        ]);
        let (mut controller, _dir) = controller_with(model, MockPdf::returning("text"));
        controller.create();
        controller.upload_pdf(b"%PDF-").unwrap();

        let outcome = controller.ask("What grew?").await.unwrap();
        assert_eq!(
            outcome,
            AskOutcome::Answered {
                answer: "It grew.".into(),
                title_generated: true
            }
        );
        assert_eq!(controller.active().unwrap().title.as_deref(), Some(UNTITLED_CHAT));
    }

    #[tokio::test]
    async fn blank_title_falls_back_to_untitled() {
        let model = MockModel::with_sequence(vec![Ok("a1".into()), Ok("   \n".into())]);
        let (mut controller, _dir) = controller_with(model, MockPdf::returning("text"));
        controller.create();
        controller.upload_pdf(b"%PDF-").unwrap();

        controller.ask("q1").await.unwrap();

        let record = controller.active().unwrap();
        assert_eq!(record.title.as_deref(), Some(UNTITLED_CHAT));
        assert_eq!(record.display_title(), UNTITLED_CHAT);
        let on_disk = controller.store().try_load().unwrap();
        assert_eq!(
            on_disk[controller.active_id().unwrap()].title.as_deref(),
            Some(UNTITLED_CHAT)
        );
    }

    #[tokio::test]
    async fn delete_returns_to_new_chat_and_persists() {
        let (mut controller, _dir) = controller_with(MockModel::new("a"), MockPdf::returning("t"));
        let first = controller.create();
        let second = controller.create();

        let removed = controller.delete(&first).unwrap();
        assert_eq!(removed, SessionRecord::default());
        assert_eq!(controller.selection(), &Selection::NewChat);

        let on_disk = controller.store().try_load().unwrap();
        assert!(!on_disk.contains_key(&first));
        assert!(on_disk.contains_key(&second));

        controller.select_new_chat();
        assert!(!controller.history().contains_key(&first));
        assert_eq!(controller.history().len(), 1);
    }

    #[test]
    fn delete_unknown_session_errors() {
        let (mut controller, _dir) = controller_with(MockModel::new("a"), MockPdf::returning("t"));
        assert!(matches!(
            controller.delete("session_1_x"),
            Err(ControllerError::UnknownSession(_))
        ));
    }
}
