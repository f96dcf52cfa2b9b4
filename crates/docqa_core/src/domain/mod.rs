use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Pdf,
    PlainText,
}

impl MediaType {
    /// Resolve a declared MIME type. Parameters (`; charset=...`) and case are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" | "application/x-pdf" => Some(Self::Pdf),
            "text/plain" | "text/markdown" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" | "md" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::PlainText => "text/plain",
        }
    }
}

/// A document as handed over by the user. Lives only until the next upload.
///
/// `declared_media_type` may be empty, in which case the file name extension decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    pub file_name: String,
    pub declared_media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(
        file_name: impl Into<String>,
        declared_media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            declared_media_type: declared_media_type.into(),
            bytes,
        }
    }

    /// Declared MIME type wins when present; the extension is only a fallback.
    pub fn resolve_media_type(&self) -> Option<MediaType> {
        if self.declared_media_type.trim().is_empty() {
            MediaType::from_file_name(&self.file_name)
        } else {
            MediaType::from_mime(&self.declared_media_type)
        }
    }
}

/// Readable content of an uploaded document.
///
/// Notes:
/// - `text` is never empty or whitespace-only; that case is reported as an error instead.
/// - `text_sha256` identifies the content in logs without logging the content itself.
/// - For plain text, `page_count` and `pages_with_text` are both 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedText {
    pub media_type: MediaType,
    pub text: String,
    pub page_count: usize,
    pub pages_with_text: usize,
    pub text_sha256: String,
}

impl ExtractedText {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
