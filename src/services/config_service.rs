//! Startup configuration.
//!
//! Exactly one environment-level setting: the base URL of the answering
//! service. It is resolved once at startup and a missing or malformed value
//! fails fast.

use std::env;

use thiserror::Error;
use url::Url;

/// Environment variable naming the answering service's base URL.
pub const API_URL_VAR: &str = "JIJI_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{0} is not a valid URL: {1}")]
    Invalid(&'static str, url::ParseError),
}

/// Settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
}

impl Config {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(API_URL_VAR) {
            Ok(raw) => Self::from_api_url(&raw),
            Err(_) => Err(ConfigError::Missing(API_URL_VAR)),
        }
    }

    fn from_api_url(raw: &str) -> Result<Self, ConfigError> {
        let api_base_url =
            Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid(API_URL_VAR, e))?;
        Ok(Self { api_base_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_valid_base_url() {
        let config = Config::from_api_url("https://api.jiji.example").unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://api.jiji.example/");
    }

    #[test]
    fn rejects_a_malformed_base_url() {
        assert!(matches!(
            Config::from_api_url("not a url"),
            Err(ConfigError::Invalid(API_URL_VAR, _))
        ));
    }
}
