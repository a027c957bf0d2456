use super::{AppConfig, ConfigError};
use crate::utils::APP_FOLDER;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Resolve the canonical path for the config file.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_FOLDER).join("config.toml"))
}

/// Load the configuration from `path`, or from `~/.vendor-ledger/config.toml`
/// when no path is given.
///
/// Returns `Ok(AppConfig::default())` if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed,
/// or if a duration in it is invalid.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match path.map(Path::to_path_buf).or_else(config_path) {
        Some(p) => p,
        None => {
            warn!("Could not determine config directory; using defaults");
            return Ok(AppConfig::default());
        }
    };
    if !path.exists() {
        debug!("Config not found at {}; using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(&path)?;
    let config: AppConfig = toml::from_str(&content)?;
    // Surface bad durations at load time rather than on first use.
    config.ledger.restore_window()?;
    config.file_tokens.ttl()?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}
