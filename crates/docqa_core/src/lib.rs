pub mod config;
pub mod domain;
pub mod error;
pub mod extract;

#[cfg(test)]
mod tests {
    use super::error::{AppError, ErrorKind};

    #[test]
    fn app_error_is_structured() {
        let err = AppError::new("AI_RATE_LIMITED", "quota exceeded").with_retryable(true);
        assert_eq!(err.code, "AI_RATE_LIMITED");
        assert_eq!(err.message, "quota exceeded");
        assert!(err.retryable);
        assert_eq!(err.kind(), ErrorKind::RateLimitError);
        assert_eq!(err.to_string(), "[AI_RATE_LIMITED] quota exceeded");
    }

    #[test]
    fn config_codes_classify_as_configuration_errors() {
        for code in ["CONFIG_MISSING_API_KEY", "CONFIG_INVALID", "CONFIG_INVALID_BASE_URL"] {
            assert_eq!(AppError::new(code, "x").kind(), ErrorKind::ConfigurationError);
        }
        assert_eq!(
            AppError::new("SESSION_NO_DOCUMENT", "x").kind(),
            ErrorKind::InvalidInput
        );
    }
}
