//! Application Configuration Module
//!
//! Loads the interview service settings from environment variables into a
//! single struct that is passed through the application.

use secrecy::SecretString;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_EVALUATION_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Gemini,
    /// Offline canned questions and length-based scoring.
    Simulated,
}

/// Holds all configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    pub openai_api_key: Option<SecretString>,
    pub gemini_api_key: Option<SecretString>,
    pub chat_model: String,
    pub evaluation_timeout: Duration,
    pub prompts_dir: PathBuf,
    pub log_level: Level,
}

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// *   `LLM_PROVIDER`: "openai", "gemini" or "simulated". Defaults to "openai".
    /// *   `OPENAI_API_KEY`: Required if provider is "openai".
    /// *   `GEMINI_API_KEY`: Required if provider is "gemini".
    /// *   `CHAT_MODEL`: (Optional) Model for question generation and scoring.
    ///     Defaults to "gpt-4o" or "gemini-2.5-flash" depending on the provider.
    /// *   `EVALUATION_TIMEOUT_SECS`: (Optional) Per-answer evaluation timeout. Defaults to 30.
    /// *   `PROMPTS_DIR`: (Optional) Directory with the prompt templates. Defaults to "prompts".
    /// *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file. Ignored if not present.
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let provider_str = var("LLM_PROVIDER").unwrap_or_else(|| "openai".to_string());
        let provider = match provider_str.to_lowercase().as_str() {
            "openai" => Provider::OpenAI,
            "gemini" => Provider::Gemini,
            "simulated" => Provider::Simulated,
            other => {
                return Err(ConfigError::InvalidValue(
                    "LLM_PROVIDER".to_string(),
                    format!("'{other}' is not one of openai, gemini, simulated"),
                ));
            }
        };

        let openai_api_key = var("OPENAI_API_KEY").map(SecretString::from);
        let gemini_api_key = var("GEMINI_API_KEY").map(SecretString::from);

        let chat_model = var("CHAT_MODEL").unwrap_or_else(|| match provider {
            Provider::Gemini => DEFAULT_GEMINI_MODEL.to_string(),
            _ => DEFAULT_OPENAI_MODEL.to_string(),
        });

        let evaluation_timeout = match var("EVALUATION_TIMEOUT_SECS") {
            Some(secs) => secs.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                ConfigError::InvalidValue("EVALUATION_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => Duration::from_secs(DEFAULT_EVALUATION_TIMEOUT_SECS),
        };

        let prompts_dir = PathBuf::from(var("PROMPTS_DIR").unwrap_or_else(|| "prompts".to_string()));

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{log_level_str}' is not a valid log level"),
            )
        })?;

        // Validate that the required API key is present for the selected provider.
        match provider {
            Provider::OpenAI if openai_api_key.is_none() => {
                return Err(ConfigError::MissingVar(
                    "OPENAI_API_KEY must be set for 'openai' provider".to_string(),
                ));
            }
            Provider::Gemini if gemini_api_key.is_none() => {
                return Err(ConfigError::MissingVar(
                    "GEMINI_API_KEY must be set for 'gemini' provider".to_string(),
                ));
            }
            _ => {}
        }

        Ok(Self {
            provider,
            openai_api_key,
            gemini_api_key,
            chat_model,
            evaluation_timeout,
            prompts_dir,
            log_level,
        })
    }
}
