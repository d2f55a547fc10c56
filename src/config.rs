//! Trapper configuration.
//!
//! Configuration can be built in code or loaded from JSON:
//!
//! ```
//! use collector_bridge::TrapperConfig;
//!
//! let config = TrapperConfig::from_json(
//!     r#"{"server": "collector.internal", "host": "web-01", "io_timeout_ms": 5000}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.port, 10051);
//! assert_eq!(config.io_timeout().as_secs(), 5);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port collectors listen on unless told otherwise.
pub const DEFAULT_PORT: u16 = 10051;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_IO_TIMEOUT_MS: u64 = 30_000;

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid trapper configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("trapper configuration field `{field}` {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Where to send items and how this process identifies itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapperConfig {
    /// Collector host name or address.
    pub server: String,
    /// Collector port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The host name this process reports as, as the collector knows it.
    pub host: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_io_timeout_ms() -> u64 {
    DEFAULT_IO_TIMEOUT_MS
}

fn millis_rounded_up(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX)
}

impl TrapperConfig {
    /// Create a configuration with the default port and timeouts.
    pub fn new(server: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            port: DEFAULT_PORT,
            host: host.into(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            io_timeout_ms: DEFAULT_IO_TIMEOUT_MS,
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sub-millisecond parts round up, so only a zero duration stores zero.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = millis_rounded_up(timeout);
        self
    }

    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout_ms = millis_rounded_up(timeout);
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });

        if self.server.trim().is_empty() {
            return invalid("server", "must not be empty");
        }
        if self.host.trim().is_empty() {
            return invalid("host", "must not be empty");
        }
        if self.port == 0 {
            return invalid("port", "must not be zero");
        }
        if self.connect_timeout_ms == 0 {
            return invalid("connect_timeout_ms", "must not be zero");
        }
        if self.io_timeout_ms == 0 {
            return invalid("io_timeout_ms", "must not be zero");
        }
        Ok(())
    }
}
