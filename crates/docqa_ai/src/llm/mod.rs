use docqa_core::error::AppError;

/// Text generation capability. One call is one request upstream; implementations never cache.
pub trait Llm {
    fn generate(&self, prompt: &str, api_key: &str) -> Result<String, AppError>;
}

pub mod cohere_llm;
