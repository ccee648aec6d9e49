//! Text extraction through MuPDF on small generated documents.

use pdfchat_core::{BackendError, PdfBackend};
use pdfchat_pdf_mupdf::MupdfBackend;

/// Build a PDF with one page per entry; each non-empty entry is drawn as a
/// single line of Helvetica text. Offsets in the xref table are computed so
/// MuPDF does not need to repair the file.
fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
    let n = pages.len();
    // 1: catalog, 2: pages, 3: font, then (page, contents) pairs.
    let page_ids: Vec<usize> = (0..n).map(|i| 4 + i * 2).collect();
    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        n
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());
    for (i, text) in pages.iter().enumerate() {
        let content_id = page_ids[i] + 1;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        let stream = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 24 Tf 72 700 Td ({text}) Tj ET")
        };
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }
    let xref_at = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for off in offsets {
        out.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        )
        .as_bytes(),
    );
    out
}

#[test]
fn single_page_text() {
    let text = MupdfBackend::new()
        .extract_text(&minimal_pdf(&["Revenue grew 10 percent."]))
        .unwrap();
    assert_eq!(text.trim(), "Revenue grew 10 percent.");
}

#[test]
fn pages_are_joined_by_single_spaces() {
    let text = MupdfBackend::new()
        .extract_text(&minimal_pdf(&["Hello", "World"]))
        .unwrap();
    assert_eq!(text, "Hello World");
}

#[test]
fn blank_page_contributes_empty_string() {
    let text = MupdfBackend::new()
        .extract_text(&minimal_pdf(&["Alpha", "", "Omega"]))
        .unwrap();
    assert_eq!(text, "Alpha  Omega");
}

#[test]
fn garbage_bytes_are_an_error() {
    let err = MupdfBackend::new()
        .extract_text(b"definitely not a pdf")
        .unwrap_err();
    assert!(matches!(
        err,
        BackendError::Open(_) | BackendError::Extraction(_)
    ));
}
