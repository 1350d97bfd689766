//! Client configuration with TOML file support.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use solbridge_feed::{activity, notification};
use solbridge_gateway::RpcConfig;
use solbridge_session::SessionConfig;

use crate::orchestrator::TransferConfig;

/// Feed tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Notification time-to-live.
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,

    /// Activity log length.
    #[serde(default = "default_activity_capacity")]
    pub activity_capacity: usize,
}

fn default_notification_ttl_ms() -> u64 {
    notification::DEFAULT_TTL_MS
}

fn default_activity_capacity() -> usize {
    activity::DEFAULT_CAPACITY
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            notification_ttl_ms: default_notification_ttl_ms(),
            activity_capacity: default_activity_capacity(),
        }
    }
}

/// Configuration for the whole client.
///
/// Can be loaded from a TOML file via [`BridgeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub rpc: RpcConfig,

    pub transfer: TransferConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl BridgeConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc.endpoint.is_empty() {
            return Err(ConfigError::Invalid("rpc.endpoint is empty".into()));
        }
        if self.transfer.spend_fraction_bps > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "transfer.spend_fraction_bps {} exceeds 10000",
                self.transfer.spend_fraction_bps
            )));
        }
        if self.feed.activity_capacity == 0 {
            return Err(ConfigError::Invalid("feed.activity_capacity is zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [rpc]
        endpoint = "https://rpc.example.org"

        [transfer]
        destination = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM"
    "#;

    #[test]
    fn minimal_config_fills_defaults() {
        let config = BridgeConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.transfer.spend_fraction_bps, 9_900);
        assert_eq!(config.transfer.confirm_timeout_ms, 30_000);
        assert_eq!(config.feed.notification_ttl_ms, 5_000);
        assert_eq!(config.feed.activity_capacity, 3);
        assert_eq!(
            config.session.handoff.primary_template,
            "https://phantom.app/ul/browse/{url}"
        );
        assert_eq!(config.session.stores.firefox.len(), 2);
    }

    #[test]
    fn overspending_fraction_rejected() {
        let raw = MINIMAL.replace(
            "destination = \"9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM\"",
            "destination = \"9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM\"\nspend_fraction_bps = 10001",
        );
        assert!(matches!(
            BridgeConfig::from_toml_str(&raw),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn empty_endpoint_rejected() {
        let raw = MINIMAL.replace("https://rpc.example.org", "");
        assert!(matches!(
            BridgeConfig::from_toml_str(&raw),
            Err(ConfigError::Invalid(_))
        ));
    }
}
