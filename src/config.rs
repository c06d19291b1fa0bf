//! Configuration management for scanbridge
//!
//! Settings are read from environment variables with defaults:
//!
//! - `SCANBRIDGE_MIN_SERVER_VERSION`: oldest supported analysis server - default: "5.6"
//! - `SCANBRIDGE_SERVER_VERSION`: server version reported by the dry-run engine - default: unset
//! - `SCANBRIDGE_LOG_LEVEL`: logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use scanbridge::BridgeConfig;
//!
//! let config = BridgeConfig::default();
//! config.validate().expect("Invalid configuration");
//! let gate = config.version_gate();
//! ```

use crate::version::{VersionGate, DEFAULT_MIN_SERVER_VERSION};
use std::env;
use std::fmt;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Valid options: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Minimum server version must not be empty")]
    EmptyMinVersion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Servers older than this are refused
    pub min_server_version: String,

    /// Version the dry-run engine reports; `None` means an unknown server
    pub server_version: Option<String>,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for BridgeConfig {
    /// Loads from `SCANBRIDGE_*` environment variables, falling back to defaults
    fn default() -> Self {
        let min_server_version = env::var("SCANBRIDGE_MIN_SERVER_VERSION")
            .ok()
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_MIN_SERVER_VERSION.to_string());

        let server_version = env::var("SCANBRIDGE_SERVER_VERSION")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let log_level = env::var("SCANBRIDGE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            min_server_version,
            server_version,
            log_level,
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }
        if self.min_server_version.is_empty() {
            return Err(ConfigError::EmptyMinVersion);
        }
        Ok(())
    }

    pub fn version_gate(&self) -> VersionGate {
        VersionGate::new(self.min_server_version.clone())
    }
}

impl fmt::Display for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scanbridge Configuration:")?;
        writeln!(f, "  Min server version: {}", self.min_server_version)?;
        writeln!(
            f,
            "  Server version: {}",
            self.server_version.as_deref().unwrap_or("<unknown>")
        )?;
        write!(f, "  Log level: {}", self.log_level)
    }
}
