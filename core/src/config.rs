//! Client configuration.
//!
//! Defaults target a backend on `localhost:8080`. `ClientConfig::from_env`
//! loads a `.env` file first, then reads:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `TODO_API_BASE_URL` | `base_url` | `http://localhost:8080` |
//! | `TODO_API_TIMEOUT_MS` | `request_timeout` | none |
//! | `TODO_STATUS_MESSAGE_TTL_MS` | `status_message_ttl` | 5000 |

use std::env;
use std::time::Duration;

use dotenv::dotenv;
use thiserror::Error;

use crate::status::STATUS_MESSAGE_TTL;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number of milliseconds, got {value:?}")]
    InvalidMillis { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin; `/api/v1/todos` is appended by the client.
    pub base_url: String,
    pub request_timeout: Option<Duration>,
    /// How long a status message stays visible.
    pub status_message_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            status_message_ttl: STATUS_MESSAGE_TTL,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base_url) = lookup("TODO_API_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(value) = lookup("TODO_API_TIMEOUT_MS") {
            config.request_timeout = Some(parse_millis("TODO_API_TIMEOUT_MS", value)?);
        }
        if let Some(value) = lookup("TODO_STATUS_MESSAGE_TTL_MS") {
            config.status_message_ttl = parse_millis("TODO_STATUS_MESSAGE_TTL_MS", value)?;
        }
        Ok(config)
    }
}

fn parse_millis(name: &'static str, value: String) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(_) => Err(ConfigError::InvalidMillis { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.status_message_ttl, Duration::from_millis(5000));
    }

    #[test]
    fn variables_override_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TODO_API_BASE_URL", "http://api.internal:9000"),
            ("TODO_API_TIMEOUT_MS", "2500"),
            ("TODO_STATUS_MESSAGE_TTL_MS", " 100 "),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://api.internal:9000");
        assert_eq!(config.request_timeout, Some(Duration::from_millis(2500)));
        assert_eq!(config.status_message_ttl, Duration::from_millis(100));
    }

    #[test]
    fn invalid_millis_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("TODO_API_TIMEOUT_MS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidMillis {
                name: "TODO_API_TIMEOUT_MS",
                value: "soon".to_string()
            }
        );
    }
}
