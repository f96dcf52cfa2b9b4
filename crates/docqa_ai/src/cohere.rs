use docqa_core::error::{AppError, CONFIG_INVALID_BASE_URL};

#[derive(Debug, Clone)]
pub struct CohereClient {
    base_url: String,
}

impl CohereClient {
    /// Create a client for the Cohere API (or a compatible endpoint).
    ///
    /// The base URL must be `http://` or `https://` with a host and no credentials; trailing
    /// slashes are trimmed.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        let authority = base_url
            .strip_prefix("https://")
            .or_else(|| base_url.strip_prefix("http://"))
            .map(|rest| rest.split('/').next().unwrap_or(""));

        let valid = match authority {
            Some(authority) => {
                let host = authority.split(':').next().unwrap_or("");
                !host.is_empty()
                    && !authority.contains('@')
                    && !authority.chars().any(char::is_whitespace)
            }
            None => false,
        };

        if !valid {
            return Err(AppError::new(
                CONFIG_INVALID_BASE_URL,
                "Language-model base URL must be an http(s) URL with a host",
            )
            .with_details(format!("base_url={base_url}")));
        }

        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn generate_url(&self) -> String {
        format!("{}/v1/generate", self.base_url)
    }
}
