//! Process configuration, resolved once at startup from environment variables.

use crate::error::{Result, TodoError};
use crate::logging::parse_level;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATABASE: &str = "smart-todo.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_LOG_RETENTION_DAYS: u32 = 7;

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
    /// Any OpenAI-compatible chat completions endpoint
    OpenAi,
}

impl LlmProvider {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => GEMINI_ENDPOINT,
            LlmProvider::OpenAi => OPENAI_ENDPOINT,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => GEMINI_MODEL,
            LlmProvider::OpenAi => OPENAI_MODEL,
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Gemini => f.write_str("gemini"),
            LlmProvider::OpenAi => f.write_str("openai"),
        }
    }
}

impl FromStr for LlmProvider {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "openai" | "openai-compatible" => Ok(LlmProvider::OpenAi),
            other => Err(TodoError::InvalidInput(format!(
                "Unknown LLM provider '{}', expected gemini or openai",
                other
            ))),
        }
    }
}

/// Generation service settings. `api_key` may be absent; that is reported per
/// request rather than at startup.
#[derive(Debug, Clone, Serialize)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub endpoint: String,
    pub model: String,
    #[serde(serialize_with = "serialize_masked")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub database: PathBuf,
    pub host: String,
    pub port: u16,
    /// Lowercase level name; `None` keeps the mode default
    pub log_level: Option<String>,
    /// Age in days after which rotated server log files are removed
    pub log_retention_days: u32,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match get("TODO_LLM_PROVIDER") {
            Some(p) => p.parse()?,
            None => LlmProvider::default(),
        };

        // The provider-specific variable wins over the generic one
        let api_key = match provider {
            LlmProvider::Gemini => get("GEMINI_API_KEY").or_else(|| get("TODO_LLM_API_KEY")),
            LlmProvider::OpenAi => get("OPENAI_API_KEY").or_else(|| get("TODO_LLM_API_KEY")),
        };

        let port = match get("TODO_PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| TodoError::InvalidInput(format!("Invalid TODO_PORT '{}'", p)))?,
            None => DEFAULT_PORT,
        };

        let log_level = match get("TODO_LOG_LEVEL") {
            Some(l) => {
                let name = l.trim().to_ascii_lowercase();
                parse_level(&name).ok_or_else(|| {
                    TodoError::InvalidInput(format!(
                        "Invalid TODO_LOG_LEVEL '{}', expected error, warn, info, debug or trace",
                        l
                    ))
                })?;
                Some(name)
            },
            None => None,
        };

        let log_retention_days = match get("TODO_LOG_RETENTION_DAYS") {
            Some(d) => d.trim().parse().map_err(|_| {
                TodoError::InvalidInput(format!("Invalid TODO_LOG_RETENTION_DAYS '{}'", d))
            })?,
            None => DEFAULT_LOG_RETENTION_DAYS,
        };

        let timeout_secs = match get("TODO_LLM_TIMEOUT_SECS") {
            Some(t) => t.parse().map_err(|_| {
                TodoError::InvalidInput(format!("Invalid TODO_LLM_TIMEOUT_SECS '{}'", t))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            database: get("TODO_DATABASE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
            host: get("TODO_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            log_level,
            log_retention_days,
            llm: LlmConfig {
                provider,
                endpoint: get("TODO_LLM_ENDPOINT")
                    .unwrap_or_else(|| provider.default_endpoint().to_string()),
                model: get("TODO_LLM_MODEL")
                    .unwrap_or_else(|| provider.default_model().to_string()),
                api_key,
                timeout_secs,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Mask a secret for display: first 4 chars + ********
pub fn mask_value(value: &str) -> String {
    if value.chars().count() <= 4 {
        "********".to_string()
    } else {
        let prefix: String = value.chars().take(4).collect();
        format!("{}...********", prefix)
    }
}

fn serialize_masked<S>(value: &Option<String>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(v) => serializer.serialize_some(&mask_value(v)),
        None => serializer.serialize_none(),
    }
}
