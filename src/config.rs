//! Configuration management with validation and defaults
//!
//! Centralized configuration for the round engine and the HTTP server,
//! loadable from a TOML file with CLI overrides applied on top.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level service configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub round: RoundConfig,
    pub server: ServerConfig,
}

/// Round engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Betting window length for every round, in seconds.
    pub duration_secs: u64,
    /// Fixed RNG seed for reproducible outcome sequences. Leave unset in
    /// production.
    pub rng_seed: Option<u64>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            duration_secs: 180,
            rng_seed: None,
        }
    }
}

/// HTTP server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    /// Load a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate for logical consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round.duration_secs == 0 {
            return Err(ConfigError::Invalid(
                "round.duration_secs must be > 0".to_string(),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.server.host.parse::<std::net::IpAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "server.host is not a valid IP address: '{}'",
                self.server.host
            )));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(String),

    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("invalid configuration value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.round.duration_secs, 180);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = ServiceConfig::from_toml_str(
            r#"
            [round]
            duration_secs = 60

            [server]
            port = 9090
            "#,
        )
        .unwrap();

        assert_eq!(config.round.duration_secs, 60);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_zero_duration_rejected() {
        let result = ServiceConfig::from_toml_str(
            r#"
            [round]
            duration_secs = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_host_rejected() {
        let mut config = ServiceConfig::default();
        config.server.host = "not-an-ip".to_string();
        assert!(config.validate().is_err());
    }
}
