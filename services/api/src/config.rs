use interview_service::config::{Config as InterviewConfig, ConfigError};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

/// Holds all configuration loaded from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Idle sessions older than this are dropped.
    pub session_ttl: Duration,
    /// Provider, model, prompt and timeout settings shared with the CLI.
    pub interview: InterviewConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// *   `BIND_ADDRESS`: The address and port to bind the server to. Defaults to "0.0.0.0:3000".
    /// *   `SESSION_TTL_SECS`: (Optional) Idle time before a session is dropped. Defaults to 1800.
    ///
    /// Everything else is read as described in [`InterviewConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_address_str =
            var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let session_ttl = match var("SESSION_TTL_SECS") {
            Some(secs) => secs
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "SESSION_TTL_SECS".to_string(),
                        format!("'{secs}' is not a positive number of seconds"),
                    )
                })?,
            None => Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        };

        Ok(Self {
            bind_address,
            session_ttl,
            interview: InterviewConfig::from_vars(var)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_service::config::Provider;

    #[test]
    fn test_default_bind_address() {
        let config = Config::from_vars(|key| match key {
            "LLM_PROVIDER" => Some("simulated".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.bind_address.to_string(), DEFAULT_BIND_ADDRESS);
        assert_eq!(config.session_ttl, Duration::from_secs(DEFAULT_SESSION_TTL_SECS));
        assert_eq!(config.interview.provider, Provider::Simulated);
    }

    #[test]
    fn test_invalid_bind_address() {
        let result = Config::from_vars(|key| match key {
            "LLM_PROVIDER" => Some("simulated".to_string()),
            "BIND_ADDRESS" => Some("localhost".to_string()),
            _ => None,
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue(_, _))));
    }

    #[test]
    fn test_session_ttl_must_be_positive() {
        let ttl = |value: &'static str| {
            Config::from_vars(move |key| match key {
                "LLM_PROVIDER" => Some("simulated".to_string()),
                "SESSION_TTL_SECS" => Some(value.to_string()),
                _ => None,
            })
        };
        assert_eq!(ttl("90").unwrap().session_ttl, Duration::from_secs(90));
        assert!(matches!(ttl("0"), Err(ConfigError::InvalidValue(_, _))));
        assert!(matches!(ttl("soon"), Err(ConfigError::InvalidValue(_, _))));
    }
}
