//! Relay configuration
//!
//! Environment-sourced settings. The default credential comes only from the
//! environment, never from a literal in the source tree.

use std::env;
use std::time::Duration;

use crate::utils::error::{RelayError, Result};

/// Default upstream endpoint for the generative-language API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when neither the request nor the environment names one
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Configuration for the relay server
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the upstream API, without a trailing slash
    pub base_url: String,
    /// Model used when the request carries no `modelName`
    pub default_model: String,
    /// Credential used when the request carries no `apiKey`
    pub default_api_key: Option<String>,
    /// Per-request upstream timeout
    pub upstream_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            default_api_key: None,
            upstream_timeout: Duration::from_secs(120),
        }
    }
}

impl RelayConfig {
    /// Load configuration from the environment
    ///
    /// Recognized variables: `RELAY_HOST`, `RELAY_PORT`, `GEMINI_BASE_URL`,
    /// `RELAY_MODEL`, `GOOGLE_API_KEY`, `RELAY_UPSTREAM_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = env::var("RELAY_HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("RELAY_PORT") {
            config.port = port
                .parse()
                .map_err(|_| RelayError::Config(format!("invalid RELAY_PORT: {port}")))?;
        }
        if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = env::var("RELAY_MODEL") {
            config.default_model = model;
        }
        config.default_api_key = env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty());
        if let Ok(timeout) = env::var("RELAY_UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = timeout.parse().map_err(|_| {
                RelayError::Config(format!("invalid RELAY_UPSTREAM_TIMEOUT_SECS: {timeout}"))
            })?;
            config.upstream_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration before serving
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(RelayError::Config("host must not be empty".to_string()));
        }
        if self.base_url.is_empty() {
            return Err(RelayError::Config(
                "upstream base URL must not be empty".to_string(),
            ));
        }
        if self.default_model.is_empty() {
            return Err(RelayError::Config(
                "default model must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Address to bind the server to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RelayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn empty_model_is_rejected() {
        let config = RelayConfig {
            default_model: String::new(),
            ..RelayConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let config = RelayConfig {
            base_url: String::new(),
            ..RelayConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
