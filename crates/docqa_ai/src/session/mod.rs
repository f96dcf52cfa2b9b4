use std::fmt;

use docqa_core::domain::{ExtractedText, MediaType, UploadedDocument};
use docqa_core::error::{AppError, ErrorKind, SESSION_EMPTY_QUESTION, SESSION_NO_DOCUMENT};
use docqa_core::extract::extract;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::llm::Llm;
use crate::prompt::build_prompt;

mod messages;

pub use messages::{error_detail, user_message};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    DocumentLoaded,
    AwaitingAnswer,
    AnswerReady,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadedDocument {
    pub file_name: String,
    pub extracted: ExtractedText,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub answered_at: Option<String>,
}

/// Per-question inputs that come from configuration rather than from the user.
#[derive(Clone, PartialEq, Eq)]
pub struct AskSettings {
    pub api_key: String,
    pub max_context_chars: usize,
}

impl fmt::Debug for AskSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AskSettings")
            .field("api_key", &"<redacted>")
            .field("max_context_chars", &self.max_context_chars)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentSummary {
    pub file_name: String,
    pub media_type: MediaType,
    pub page_count: usize,
    pub pages_with_text: usize,
    pub char_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorView {
    pub code: String,
    pub kind: ErrorKind,
    pub message: String,
    /// Verbatim message and details from the layer that failed.
    pub detail: Option<String>,
    pub retryable: bool,
}

/// What the interface renders: the latest result only, never a history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionView {
    pub state: SessionState,
    pub document: Option<DocumentSummary>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub answered_at: Option<String>,
    pub error: Option<ErrorView>,
}

/// One user's question-answering context.
///
/// State machine:
/// - `Idle -> DocumentLoaded` on a successful upload, `-> Error` when extraction fails.
/// - `DocumentLoaded | AnswerReady | Error -> AwaitingAnswer` on a non-empty question while a
///   document is loaded.
/// - `AwaitingAnswer -> AnswerReady | Error` when the model call returns.
/// - Any state `-> Idle` on `clear`; a new upload always starts from a clean slate.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    document: Option<LoadedDocument>,
    last_question: Option<String>,
    last_answer: Option<Answer>,
    last_error: Option<AppError>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            document: None,
            last_question: None,
            last_answer: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn last_answer(&self) -> Option<&Answer> {
        self.last_answer.as_ref()
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Replace the current document. The previous document, answer and error are dropped even
    /// if the new one fails to extract.
    pub fn upload(&mut self, document: UploadedDocument) -> Result<&LoadedDocument, AppError> {
        self.clear();
        match extract(&document) {
            Ok(extracted) => {
                self.state = SessionState::DocumentLoaded;
                Ok(self.document.insert(LoadedDocument {
                    file_name: document.file_name,
                    extracted,
                }))
            }
            Err(e) => {
                log::info!("document {} rejected: {}", document.file_name, e);
                self.reject_upload(e.clone());
                Err(e)
            }
        }
    }

    /// Record an upload that failed before its bytes reached the extractor, e.g. an unreadable
    /// file. Same outcome as a failed extraction: no document, `Error` state.
    pub fn reject_upload(&mut self, err: AppError) {
        self.clear();
        self.state = SessionState::Error;
        self.last_error = Some(err);
    }

    /// Ask a question about the loaded document. Exactly one `generate` call per accepted
    /// question; nothing is cached.
    ///
    /// Rejected input (blank question, no document) leaves the state untouched. `&mut self` keeps
    /// a second question from starting while one is in flight.
    pub fn ask(
        &mut self,
        llm: &dyn Llm,
        settings: &AskSettings,
        question: &str,
    ) -> Result<&str, AppError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::new(SESSION_EMPTY_QUESTION, "Please enter a question."));
        }
        let prompt = match self.document.as_ref() {
            Some(doc) => build_prompt(&doc.extracted.text, question, settings.max_context_chars),
            None => {
                return Err(AppError::new(
                    SESSION_NO_DOCUMENT,
                    "Upload a document before asking a question.",
                ))
            }
        };
        if prompt.truncated {
            log::warn!(
                "document truncated to {} chars to fit the context limit",
                prompt.context_chars
            );
        }

        self.state = SessionState::AwaitingAnswer;
        self.last_question = Some(question.to_string());
        self.last_answer = None;
        self.last_error = None;

        match llm.generate(&prompt.text, &settings.api_key) {
            Ok(text) => {
                log::info!(
                    "answered question ({} chars) with {} chars",
                    question.chars().count(),
                    text.chars().count()
                );
                self.state = SessionState::AnswerReady;
                let answer = self.last_answer.insert(Answer {
                    text,
                    answered_at: now_rfc3339_utc(),
                });
                Ok(answer.text.as_str())
            }
            Err(e) => {
                log::warn!("question failed: {e}");
                self.state = SessionState::Error;
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            state: self.state,
            document: self.document.as_ref().map(|d| DocumentSummary {
                file_name: d.file_name.clone(),
                media_type: d.extracted.media_type,
                page_count: d.extracted.page_count,
                pages_with_text: d.extracted.pages_with_text,
                char_count: d.extracted.char_count(),
            }),
            question: self.last_question.clone(),
            answer: self.last_answer.as_ref().map(|a| a.text.clone()),
            answered_at: self.last_answer.as_ref().and_then(|a| a.answered_at.clone()),
            error: self.last_error.as_ref().map(|e| ErrorView {
                code: e.code.clone(),
                kind: e.kind(),
                message: user_message(e),
                detail: error_detail(e),
                retryable: e.retryable,
            }),
        }
    }
}

fn now_rfc3339_utc() -> Option<String> {
    OffsetDateTime::now_utc().format(&Rfc3339).ok()
}
