//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Tunables for node resolution and the expiry loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Period of the timed-expiry loop, in milliseconds.
    pub tick_interval_ms: u64,

    /// Deepest activation chain allowed before processing fails.
    pub max_depth: usize,

    /// Seed for weighted-random selection. Random when absent.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            max_depth: 64,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn tick_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.max_depth, 64);
        assert!(config.rng_seed.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("max_depth = 8\nrng_seed = 42").unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.tick_interval_ms, 1000);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = EngineConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            EngineConfig::from_toml_str("max_depth = \"deep\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
