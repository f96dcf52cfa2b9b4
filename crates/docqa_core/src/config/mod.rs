use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, CONFIG_INVALID, CONFIG_MISSING_API_KEY};

pub const API_KEY_VAR: &str = "COHERE_API_KEY";
pub const SECRETS_FILE_VAR: &str = "DOCQA_SECRETS_FILE";
pub const DEFAULT_SECRETS_FILE: &str = ".docqa/secrets.toml";

pub const DEFAULT_MODEL: &str = "command-r-plus";
pub const DEFAULT_BASE_URL: &str = "https://api.cohere.ai";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 12_000;
pub const DEFAULT_MAX_TOKENS: u32 = 64;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl LogLevel {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Process-wide settings, resolved once at startup.
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_context_chars: usize,
    pub max_tokens: u32,
    pub temperature: f64,
    pub log_level: LogLevel,
}

// Hand-written so the API key never reaches a log line.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_context_chars", &self.max_context_chars)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl AppConfig {
    /// Build a config from a key lookup. Blank values count as unset.
    ///
    /// The API key is the only required value; everything else has a default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(API_KEY_VAR).ok_or_else(|| {
            AppError::new(
                CONFIG_MISSING_API_KEY,
                "The language-model API key is not configured",
            )
            .with_details(format!(
                "set {API_KEY_VAR} in the environment or in {DEFAULT_SECRETS_FILE}"
            ))
        })?;

        let log_level = match get("DOCQA_LOG_LEVEL") {
            Some(v) => LogLevel::parse(&v).ok_or_else(|| invalid("DOCQA_LOG_LEVEL", &v))?,
            None => LogLevel::default(),
        };

        let temperature =
            parse_or("DOCQA_TEMPERATURE", get("DOCQA_TEMPERATURE"), DEFAULT_TEMPERATURE)?;
        if !(0.0..=5.0).contains(&temperature) {
            return Err(invalid("DOCQA_TEMPERATURE", &temperature.to_string()));
        }

        let timeout_secs =
            parse_or("DOCQA_TIMEOUT_SECS", get("DOCQA_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(invalid("DOCQA_TIMEOUT_SECS", "0"));
        }

        // Zero would send every question with an empty context.
        let max_context_chars = parse_or(
            "DOCQA_MAX_CONTEXT_CHARS",
            get("DOCQA_MAX_CONTEXT_CHARS"),
            DEFAULT_MAX_CONTEXT_CHARS,
        )?;
        if max_context_chars == 0 {
            return Err(invalid("DOCQA_MAX_CONTEXT_CHARS", "0"));
        }

        Ok(Self {
            api_key,
            model: get("DOCQA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get("DOCQA_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs,
            max_context_chars,
            max_tokens: parse_or("DOCQA_MAX_TOKENS", get("DOCQA_MAX_TOKENS"), DEFAULT_MAX_TOKENS)?,
            temperature,
            log_level,
        })
    }
}

fn invalid(key: &str, value: &str) -> AppError {
    AppError::new(CONFIG_INVALID, "Invalid configuration value")
        .with_details(format!("key={key}; value={value}"))
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    value: Option<String>,
    default: T,
) -> Result<T, AppError> {
    match value {
        Some(v) => v.parse::<T>().map_err(|_| invalid(key, &v)),
        None => Ok(default),
    }
}

/// Parse a flat `KEY = value` secrets table. Strings, integers, floats and booleans are accepted.
pub fn parse_secrets(text: &str) -> Result<BTreeMap<String, String>, AppError> {
    let table: toml::Table = toml::from_str(text).map_err(|e| {
        AppError::new(CONFIG_INVALID, "Failed to parse secrets file").with_details(e.to_string())
    })?;

    let mut out = BTreeMap::new();
    for (key, value) in table {
        let value = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            _ => {
                return Err(AppError::new(
                    CONFIG_INVALID,
                    "Secrets file values must be plain scalars",
                )
                .with_details(format!("key={key}")))
            }
        };
        out.insert(key, value);
    }
    Ok(out)
}

/// A missing secrets file is not an error; the environment may carry everything.
pub fn read_secrets_file(path: &Path) -> Result<BTreeMap<String, String>, AppError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::new(CONFIG_INVALID, "Failed to read secrets file")
            .with_details(format!("path={}; err={}", path.display(), e))
    })?;
    parse_secrets(&text)
}

pub fn secrets_path_from_env() -> PathBuf {
    std::env::var(SECRETS_FILE_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_FILE))
}

/// Merge an environment lookup over the secrets file at `secrets_path`.
///
/// A blank environment value does not shadow the file.
pub fn load_config_from(
    env: impl Fn(&str) -> Option<String>,
    secrets_path: &Path,
) -> Result<AppConfig, AppError> {
    let secrets = read_secrets_file(secrets_path)?;
    AppConfig::from_lookup(|key| {
        env(key)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| secrets.get(key).cloned())
    })
}

/// Resolve the process configuration: environment variables first, then the secrets file.
pub fn load_config() -> Result<AppConfig, AppError> {
    load_config_from(|key| std::env::var(key).ok(), &secrets_path_from_env())
}
