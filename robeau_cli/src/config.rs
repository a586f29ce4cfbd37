//! Configuration file for the console driver.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use robeau_core::{ConfigError, EngineConfig};

/// Phrases and timing of the interactive loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Opens a query window.
    pub start_phrase: String,
    /// Ends the program, from the outer prompt or inside a query window.
    pub exit_phrase: String,
    /// Seconds of silence before a query window closes.
    pub query_window_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_phrase: "start".to_string(),
            exit_phrase: "exit".to_string(),
            query_window_secs: 10,
        }
    }
}

impl SessionConfig {
    pub fn query_window(&self) -> Duration {
        Duration::from_secs(self.query_window_secs)
    }
}

/// The whole configuration file: `[engine]` and `[session]` tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobeauConfig {
    pub engine: EngineConfig,
    pub session: SessionConfig,
}

impl RobeauConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}
