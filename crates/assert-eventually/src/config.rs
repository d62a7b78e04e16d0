//! Time constraint configuration with precedence
//!
//! Loads polling settings from the following sources (low to high):
//! 1. Built-in defaults (15 second timeout, 1 second check interval)
//! 2. A YAML file, when one is given
//! 3. Environment variables (`ASSERT_EVENTUALLY_*` prefix)

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::time::{TimeConstraint, DEFAULT_CHECK_INTERVAL, DEFAULT_TIMEOUT};

/// Overrides the configured timeout, in milliseconds
pub const TIMEOUT_ENV: &str = "ASSERT_EVENTUALLY_TIMEOUT_MS";

/// Overrides the configured check interval, in milliseconds
pub const CHECK_INTERVAL_ENV: &str = "ASSERT_EVENTUALLY_CHECK_INTERVAL_MS";

/// Polling settings as written in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PollConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_check_interval_ms() -> u64 {
    DEFAULT_CHECK_INTERVAL.as_millis() as u64
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            check_interval_ms: default_check_interval_ms(),
        }
    }
}

impl PollConfig {
    /// Parse a YAML document; missing fields take their defaults
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Load from a YAML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&content).map_err(|e| {
            Error::invalid_config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loaded poll configuration");
        config.apply_env_overrides()
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env_overrides()
    }

    /// Apply `ASSERT_EVENTUALLY_*` environment variables on top of this config
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Ok(val) = env::var(TIMEOUT_ENV) {
            self.timeout_ms = val.trim().parse().map_err(|_| {
                Error::invalid_config(format!("{} must be a valid number", TIMEOUT_ENV))
            })?;
        }

        if let Ok(val) = env::var(CHECK_INTERVAL_ENV) {
            self.check_interval_ms = val.trim().parse().map_err(|_| {
                Error::invalid_config(format!("{} must be a valid number", CHECK_INTERVAL_ENV))
            })?;
        }

        Ok(self)
    }

    /// Validate into a time constraint
    ///
    /// Zero values are rejected with the same errors as [`TimeConstraint::new`].
    pub fn to_time_constraint(&self) -> Result<TimeConstraint> {
        TimeConstraint::new(
            Duration::from_millis(self.timeout_ms),
            Duration::from_millis(self.check_interval_ms),
        )
    }
}
