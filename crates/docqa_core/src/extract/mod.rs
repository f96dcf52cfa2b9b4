use sha2::{Digest, Sha256};

use crate::domain::{ExtractedText, MediaType, UploadedDocument};
use crate::error::{AppError, EXTRACT_EMPTY_DOCUMENT, EXTRACT_UNSUPPORTED_FORMAT};

pub mod pdf;
pub mod plain_text;

/// Turn an uploaded document into plain text.
///
/// Empty results are reported as `EXTRACT_EMPTY_DOCUMENT` so the caller can warn that the file is
/// probably a scanned image, instead of asking the model about nothing.
pub fn extract(document: &UploadedDocument) -> Result<ExtractedText, AppError> {
    let media_type = document.resolve_media_type().ok_or_else(|| {
        AppError::new(
            EXTRACT_UNSUPPORTED_FORMAT,
            "Only PDF and plain text documents are supported",
        )
        .with_details(format!(
            "file_name={}; media_type={}",
            document.file_name, document.declared_media_type
        ))
    })?;

    let (text, page_count, pages_with_text) = match media_type {
        MediaType::Pdf => {
            let pages = pdf::extract_pages(&document.bytes)?;
            (pdf::join_pages(&pages.texts), pages.page_count, pages.texts.len())
        }
        MediaType::PlainText => (plain_text::decode(&document.bytes)?, 1, 1),
    };

    if text.trim().is_empty() {
        return Err(AppError::new(
            EXTRACT_EMPTY_DOCUMENT,
            "No readable text was found in the document",
        )
        .with_details(format!(
            "file_name={}; pages={page_count}",
            document.file_name
        )));
    }

    let text_sha256 = sha256_hex(&text);
    log::info!(
        "extracted {} chars from {} ({} of {} pages with text, sha256={})",
        text.chars().count(),
        document.file_name,
        pages_with_text,
        page_count,
        text_sha256
    );

    Ok(ExtractedText {
        media_type,
        text,
        page_count,
        pages_with_text,
        text_sha256,
    })
}

fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
