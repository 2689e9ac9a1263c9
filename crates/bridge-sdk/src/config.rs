//! Bridge configuration file.

use std::path::Path;

use anyhow::{Context, Result};
use bridge_core::CycleConfig;
use bridge_observability::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Cycle and driver settings.
    #[serde(default)]
    pub cycle: CycleConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Load config from a file. JSON if the path ends in `.json`, TOML
    /// otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            Self::from_toml_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Parse TOML config text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Install the global log subscriber described by `config`.
pub fn init_logging(config: &BridgeConfig) -> Result<()> {
    bridge_observability::init(&config.logging).context("Failed to install log subscriber")
}
