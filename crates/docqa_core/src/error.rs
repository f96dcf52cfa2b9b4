use serde::{Deserialize, Serialize};
use std::fmt;

pub const EXTRACT_UNSUPPORTED_FORMAT: &str = "EXTRACT_UNSUPPORTED_FORMAT";
pub const EXTRACT_DECODING_FAILED: &str = "EXTRACT_DECODING_FAILED";
pub const EXTRACT_EMPTY_DOCUMENT: &str = "EXTRACT_EMPTY_DOCUMENT";

pub const AI_AUTH_FAILED: &str = "AI_AUTH_FAILED";
pub const AI_RATE_LIMITED: &str = "AI_RATE_LIMITED";
pub const AI_NETWORK_FAILED: &str = "AI_NETWORK_FAILED";
pub const AI_UPSTREAM_FAILED: &str = "AI_UPSTREAM_FAILED";

pub const CONFIG_MISSING_API_KEY: &str = "CONFIG_MISSING_API_KEY";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const CONFIG_INVALID_BASE_URL: &str = "CONFIG_INVALID_BASE_URL";

pub const SESSION_EMPTY_QUESTION: &str = "SESSION_EMPTY_QUESTION";
pub const SESSION_NO_DOCUMENT: &str = "SESSION_NO_DOCUMENT";
pub const SESSION_IO_FAILED: &str = "SESSION_IO_FAILED";
pub const SESSION_UNKNOWN_COMMAND: &str = "SESSION_UNKNOWN_COMMAND";

/// Single structured error shape used across the extractor, the answer client and the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

/// Coarse classification of error codes. Callers branch on this instead of matching strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedFormat,
    DecodingError,
    EmptyDocument,
    AuthenticationError,
    RateLimitError,
    NetworkError,
    UpstreamError,
    ConfigurationError,
    InvalidInput,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code.as_str() {
            EXTRACT_UNSUPPORTED_FORMAT => ErrorKind::UnsupportedFormat,
            EXTRACT_DECODING_FAILED => ErrorKind::DecodingError,
            EXTRACT_EMPTY_DOCUMENT => ErrorKind::EmptyDocument,
            AI_AUTH_FAILED => ErrorKind::AuthenticationError,
            AI_RATE_LIMITED => ErrorKind::RateLimitError,
            AI_NETWORK_FAILED => ErrorKind::NetworkError,
            AI_UPSTREAM_FAILED => ErrorKind::UpstreamError,
            c if c.starts_with("CONFIG_") => ErrorKind::ConfigurationError,
            _ => ErrorKind::InvalidInput,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
