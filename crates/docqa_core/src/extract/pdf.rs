use lopdf::Document;

use crate::error::{AppError, EXTRACT_DECODING_FAILED};

/// Text-bearing pages of a PDF, in page order, keyed by 1-based page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfPages {
    pub page_count: usize,
    pub texts: Vec<(u32, String)>,
}

pub fn extract_pages(bytes: &[u8]) -> Result<PdfPages, AppError> {
    let doc = Document::load_mem(bytes).map_err(|e| {
        AppError::new(EXTRACT_DECODING_FAILED, "Failed to read PDF document")
            .with_details(e.to_string())
    })?;

    let pages = doc.get_pages();
    let page_count = pages.len();
    let mut texts = Vec::new();
    for page_num in pages.keys().copied() {
        // Image-only or otherwise unreadable pages are skipped, not fatal.
        match doc.extract_text(&[page_num]) {
            Ok(text) if !text.trim().is_empty() => texts.push((page_num, text)),
            Ok(_) => log::debug!("pdf page {page_num} has no extractable text"),
            Err(e) => log::debug!("pdf page {page_num} text extraction failed: {e}"),
        }
    }

    Ok(PdfPages { page_count, texts })
}

/// `[Page N]` header per page, each page terminated by a newline.
pub fn join_pages(texts: &[(u32, String)]) -> String {
    let mut out = String::new();
    for (page_num, text) in texts {
        out.push_str(&format!("[Page {page_num}]\n"));
        out.push_str(text.trim_end());
        out.push('\n');
    }
    out
}
