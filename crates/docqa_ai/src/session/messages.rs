use docqa_core::error::{AppError, ErrorKind};

/// Plain-language message for an error, specific to its kind.
pub fn user_message(err: &AppError) -> String {
    match err.kind() {
        ErrorKind::UnsupportedFormat => {
            "This file type is not supported. Please upload a PDF or a plain text file.".to_string()
        }
        ErrorKind::DecodingError => {
            "The document could not be read. It may be corrupted, or the text is not valid UTF-8."
                .to_string()
        }
        ErrorKind::EmptyDocument => "No readable text was found in this document. It may be a \
             scanned image; try a PDF that contains selectable text."
            .to_string(),
        ErrorKind::AuthenticationError => {
            "The language-model service rejected the API key. Check the configured key.".to_string()
        }
        ErrorKind::RateLimitError => "The language-model service rate limit was reached. Wait a \
             moment, then ask again."
            .to_string(),
        ErrorKind::NetworkError => "Could not reach the language-model service (the connection \
             failed or timed out). Please try again."
            .to_string(),
        ErrorKind::UpstreamError => {
            "The language-model service returned an unusable response. Please try again."
                .to_string()
        }
        ErrorKind::ConfigurationError => format!("Configuration problem: {}.", err.message),
        ErrorKind::InvalidInput => err.message.clone(),
    }
}

/// The error's own message and details, exactly as the failing layer reported them.
///
/// `None` when that would only repeat `user_message`.
pub fn error_detail(err: &AppError) -> Option<String> {
    match &err.details {
        Some(details) => Some(format!("{} ({details})", err.message)),
        None if user_message(err) == err.message => None,
        None => Some(err.message.clone()),
    }
}
