//! Cycle and driver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Close code recorded when the application closes without one.
pub const DEFAULT_CLOSE_CODE: u16 = 1000;

/// Configuration for cycles and the exchange driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// How long the driver keeps polling the application after the HTTP
    /// cycle has closed, in milliseconds.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
    /// Close code recorded for a WebSocket close without a code.
    #[serde(default = "default_close_code")]
    pub default_close_code: u16,
}

fn default_shutdown_grace_ms() -> u64 {
    50
}

fn default_close_code() -> u16 {
    DEFAULT_CLOSE_CODE
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            shutdown_grace_ms: default_shutdown_grace_ms(),
            default_close_code: default_close_code(),
        }
    }
}

impl CycleConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown grace period.
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the default close code.
    pub fn with_default_close_code(mut self, code: u16) -> Self {
        self.default_close_code = code;
        self
    }

    /// Shutdown grace period as a `Duration`.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}
