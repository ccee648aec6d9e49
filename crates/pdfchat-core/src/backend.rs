use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors turn the raw bytes of an uploaded document into one string:
/// the text of every page, joined by single spaces. A page that yields no
/// text contributes an empty string instead of failing the document.
pub trait PdfBackend: Send + Sync {
    fn extract_text(&self, data: &[u8]) -> Result<String, BackendError>;
}

/// Check whether an upload looks like a PDF, by extension or magic bytes.
pub fn is_pdf(filename: &str, data: &[u8]) -> bool {
    filename.to_lowercase().ends_with(".pdf") || data.starts_with(b"%PDF-")
}

/// Canned [`PdfBackend`] for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{BackendError, PdfBackend};

    /// Returns the same text (or error) for every document.
    pub struct MockPdf {
        text: Result<String, String>,
        calls: AtomicUsize,
    }

    impl MockPdf {
        pub fn returning(text: impl Into<String>) -> Self {
            Self {
                text: Ok(text.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                text: Err(message.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PdfBackend for MockPdf {
        fn extract_text(&self, _data: &[u8]) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.text.clone().map_err(BackendError::Open)
        }
    }
}
