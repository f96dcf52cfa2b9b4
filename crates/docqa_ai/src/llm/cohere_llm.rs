use std::time::Duration;

use docqa_core::config::AppConfig;
use docqa_core::error::{
    AppError, AI_AUTH_FAILED, AI_NETWORK_FAILED, AI_RATE_LIMITED, AI_UPSTREAM_FAILED,
};
use serde::{Deserialize, Serialize};

use super::Llm;
use crate::cohere::CohereClient;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
}

impl GenerationSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CohereLlm {
    client: CohereClient,
    settings: GenerationSettings,
}

impl CohereLlm {
    pub fn new(client: CohereClient, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    generations: Vec<Generation>,
}

#[derive(Debug, Clone, Deserialize)]
struct Generation {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl Llm for CohereLlm {
    fn generate(&self, prompt: &str, api_key: &str) -> Result<String, AppError> {
        if api_key.trim().is_empty() {
            return Err(AppError::new(AI_AUTH_FAILED, "API key is missing"));
        }

        let req = GenerateRequest {
            model: &self.settings.model,
            prompt,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };
        let body = serde_json::to_value(req).map_err(|e| {
            AppError::new(AI_UPSTREAM_FAILED, "Failed to encode generate request")
                .with_details(e.to_string())
        })?;

        let resp = ureq::post(&self.client.generate_url())
            .timeout(self.settings.timeout)
            .set("Authorization", &format!("Bearer {}", api_key.trim()))
            .set("Accept", "application/json")
            .send_json(body);

        match resp {
            Ok(r) => {
                let v: GenerateResponse = r.into_json().map_err(|e| {
                    AppError::new(AI_UPSTREAM_FAILED, "Failed to decode generate response")
                        .with_details(e.to_string())
                })?;
                let text = v
                    .generations
                    .into_iter()
                    .next()
                    .map(|g| g.text.trim().to_string())
                    .unwrap_or_default();
                if text.is_empty() {
                    return Err(AppError::new(
                        AI_UPSTREAM_FAILED,
                        "Generate response contained no text",
                    ));
                }
                Ok(text)
            }
            Err(ureq::Error::Status(status, r)) => {
                let err = classify_status(status, r.into_string().ok().as_deref());
                log::warn!("generate request failed: {err}");
                Err(err)
            }
            Err(ureq::Error::Transport(t)) => {
                log::warn!("generate request did not complete: {t}");
                Err(
                    AppError::new(AI_NETWORK_FAILED, "Failed to reach the language-model service")
                        .with_details(t.to_string())
                        .with_retryable(true),
                )
            }
        }
    }
}

/// Map a non-2xx status to the client error taxonomy. Rate limits surface immediately; the
/// caller decides whether to try again.
pub(crate) fn classify_status(status: u16, body: Option<&str>) -> AppError {
    let upstream_message = body
        .and_then(|b| serde_json::from_str::<ErrorBody>(b).ok())
        .and_then(|b| b.message);
    let details = match upstream_message {
        Some(m) => format!("status={status}; message={m}"),
        None => format!("status={status}"),
    };

    let err = match status {
        401 | 403 => AppError::new(AI_AUTH_FAILED, "The API key was rejected"),
        429 => AppError::new(AI_RATE_LIMITED, "Rate limit or quota exceeded").with_retryable(true),
        500..=599 => {
            AppError::new(AI_UPSTREAM_FAILED, "The language-model service failed").with_retryable(true)
        }
        _ => AppError::new(AI_UPSTREAM_FAILED, "The language-model service rejected the request"),
    };
    err.with_details(details)
}
