use mupdf::{Document, Page, TextPageFlags};

use pdfchat_core::{BackendError, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the session store and the web endpoint do
/// not transitively depend on it.
///
/// Uploaded bytes are staged in a temporary directory and opened from
/// there. Each page's lines are joined with newlines and the pages are
/// joined with single spaces.
#[derive(Debug, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_text(&self, data: &[u8]) -> Result<String, BackendError> {
        // Temp dir lives until the document is dropped at the end of scope
        let temp_dir = tempfile::tempdir()?;
        let pdf_path = temp_dir.path().join("upload.pdf");
        std::fs::write(&pdf_path, data)?;

        let path_str = pdf_path
            .to_str()
            .ok_or_else(|| BackendError::Open("invalid path encoding".into()))?;
        let document = Document::open(path_str).map_err(|e| BackendError::Open(e.to_string()))?;

        let mut pages_text = Vec::new();
        for (index, page_result) in document
            .pages()
            .map_err(|e| BackendError::Extraction(e.to_string()))?
            .enumerate()
        {
            let text = match page_result
                .map_err(|e| e.to_string())
                .and_then(|page| page_text(&page).map_err(|e| e.to_string()))
            {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(page = index, error = %e, "page has no extractable text");
                    String::new()
                }
            };
            pages_text.push(text);
        }

        Ok(pages_text.join(" "))
    }
}

/// Text of one page, lines separated by `\n`, no trailing newline.
fn page_text(page: &Page) -> Result<String, mupdf::Error> {
    let text_page = page.to_text_page(TextPageFlags::empty())?;

    let mut lines = Vec::new();
    for block in text_page.blocks() {
        for line in block.lines() {
            let line_text: String = line
                .chars()
                .map(|c| c.char().unwrap_or('\u{FFFD}'))
                .collect();
            lines.push(line_text);
        }
    }
    Ok(lines.join("\n"))
}
