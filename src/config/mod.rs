//! Application configuration loaded from `~/.vendor-ledger/config.toml`.
//!
//! The file is optional; every table falls back to its `Default`.
mod loader;

pub use loader::{config_path, load_config};

use crate::flags::FeatureFlags;
use crate::ledger::RestoreWindow;
use crate::utils::{app_home, expand_home};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid duration for {field}: '{value}' ({reason})")]
    InvalidDuration {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Restore window must be positive, got '{0}'")]
    InvalidWindow(String),
}

fn default_restore_window() -> String {
    "30days".to_string()
}

fn default_token_ttl() -> String {
    "1h".to_string()
}

fn parse_duration(field: &'static str, value: &str) -> Result<std::time::Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::InvalidDuration {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// `[ledger]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// How long a deleted record stays restorable (humantime syntax)
    #[serde(default = "default_restore_window")]
    pub restore_window: String,
    /// Directory holding `vendors.json`, `invoices.json` and `audit.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            restore_window: default_restore_window(),
            data_dir: None,
        }
    }
}

impl LedgerConfig {
    /// Parse `restore_window`. Zero is rejected.
    pub fn restore_window(&self) -> Result<RestoreWindow, ConfigError> {
        let duration = parse_duration("ledger.restore_window", &self.restore_window)?;
        RestoreWindow::from_std(duration)
            .ok_or_else(|| ConfigError::InvalidWindow(self.restore_window.clone()))
    }

    /// Configured data directory with `~` expanded, or `~/.vendor-ledger/data`.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .as_deref()
            .map_or_else(|| app_home().join("data"), expand_home)
    }
}

/// `[file_tokens]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileTokenConfig {
    #[serde(default = "default_token_ttl")]
    pub ttl: String,
}

impl Default for FileTokenConfig {
    fn default() -> Self {
        Self {
            ttl: default_token_ttl(),
        }
    }
}

impl FileTokenConfig {
    pub fn ttl(&self) -> Result<chrono::Duration, ConfigError> {
        let duration = parse_duration("file_tokens.ttl", &self.ttl)?;
        chrono::Duration::from_std(duration).map_err(|e| ConfigError::InvalidDuration {
            field: "file_tokens.ttl",
            value: self.ttl.clone(),
            reason: e.to_string(),
        })
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub file_tokens: FileTokenConfig,
    #[serde(default)]
    pub flags: FeatureFlags,
}

#[cfg(test)]
#[path = "../config_tests.rs"]
mod config_tests;
