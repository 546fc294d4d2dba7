//! Configuration for HygroIO
//!
//! Loads configuration from a TOML file. Every field has a default, so an
//! empty file (or no file at all) gives a working 4800-baud setup.

use crate::error::{Error, Result};
use crate::protocol::constants::{DEFAULT_MAX_BUFFER_BYTES, MIN_RECORD_LEN};
use crate::protocol::{DrainPolicy, ParserConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub parser: ParserSection,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// Serial port settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SerialConfig {
    /// Port path; when absent the last used port is tried
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Baud rate (default: 4800, 8N1)
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Per-read timeout in milliseconds (default: 100)
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Delay between polls of the port in milliseconds (default: 100)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Stream parser settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ParserSection {
    /// "all" drains every complete block per read, "single" only one
    #[serde(default)]
    pub drain_policy: DrainPolicy,

    /// Unterminated bytes kept before the buffer is discarded (default: 4096)
    #[serde(default = "default_max_buffer_bytes")]
    pub max_buffer_bytes: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Persisted settings location
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SettingsConfig {
    /// File remembering the last used port
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

fn default_baud_rate() -> u32 {
    4800
}

fn default_read_timeout_ms() -> u64 {
    100
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_max_buffer_bytes() -> usize {
    DEFAULT_MAX_BUFFER_BYTES
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_state_file() -> String {
    "hygro-io-state.toml".to_string()
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for ParserSection {
    fn default() -> Self {
        Self {
            drain_policy: DrainPolicy::default(),
            max_buffer_bytes: default_max_buffer_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
        }
    }
}

impl SerialConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl ParserSection {
    pub fn to_parser_config(&self) -> ParserConfig {
        ParserConfig {
            drain_policy: self.drain_policy,
            max_buffer_bytes: self.max_buffer_bytes,
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use hygro_io::config::Config;
    ///
    /// let config = Config::load("hygro-io.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the reader cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.serial.baud_rate == 0 {
            return Err(Error::Config("serial.baud_rate must be > 0".to_string()));
        }
        if self.serial.poll_interval_ms == 0 {
            return Err(Error::Config(
                "serial.poll_interval_ms must be > 0".to_string(),
            ));
        }
        if self.parser.max_buffer_bytes < MIN_RECORD_LEN {
            return Err(Error::Config(format!(
                "parser.max_buffer_bytes must be at least {}",
                MIN_RECORD_LEN
            )));
        }
        Ok(())
    }
}
