use crate::error::{AppError, EXTRACT_DECODING_FAILED};

/// Decode UTF-8 bytes verbatim. No trimming and no BOM handling: what was uploaded is what the
/// model sees.
pub fn decode(bytes: &[u8]) -> Result<String, AppError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_string()),
        Err(e) => Err(
            AppError::new(EXTRACT_DECODING_FAILED, "Document is not valid UTF-8 text")
                .with_details(format!("valid_up_to={}", e.valid_up_to())),
        ),
    }
}
