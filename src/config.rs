//! Widget configuration from the environment

use std::time::Duration;
use thiserror::Error;

pub const ENDPOINT_VAR: &str = "WPCHATBOT_ENDPOINT";
pub const USER_ID_VAR: &str = "WPCHATBOT_USER_ID";
pub const INITIAL_MESSAGE_VAR: &str = "WPCHATBOT_INITIAL_MESSAGE";
pub const REQUEST_TIMEOUT_VAR: &str = "WPCHATBOT_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("WPCHATBOT_USER_ID must be an integer, got {0:?}")]
    InvalidUserId(String),
    #[error("WPCHATBOT_REQUEST_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Host-supplied settings for one widget instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Chat endpoint that receives the request envelope
    pub endpoint: String,
    pub user_id: i64,
    /// Greeting shown as the first bot turn
    pub initial_message: Option<String>,
    /// `None` waits for the service indefinitely
    pub request_timeout: Option<Duration>,
}

impl WidgetConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let endpoint = get(ENDPOINT_VAR).ok_or(ConfigError::Missing(ENDPOINT_VAR))?;
        let raw_user_id = get(USER_ID_VAR).ok_or(ConfigError::Missing(USER_ID_VAR))?;
        let user_id = raw_user_id
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidUserId(raw_user_id.clone()))?;

        let request_timeout = get(REQUEST_TIMEOUT_VAR)
            .map(|raw| match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(ConfigError::InvalidTimeout(raw)),
            })
            .transpose()?;

        Ok(Self {
            endpoint,
            user_id,
            // The greeting keeps its own whitespace
            initial_message: lookup(INITIAL_MESSAGE_VAR).filter(|m| !m.trim().is_empty()),
            request_timeout,
        })
    }
}
