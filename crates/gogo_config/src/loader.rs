//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ToolConfig;
use gogo_common::TOOL_NAME;
use std::path::{Path, PathBuf};

/// File name of the configuration inside the tool's config directory.
const CONFIG_FILE: &str = "config.toml";

/// Returns `<platform config dir>/gogo/config.toml`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(TOOL_NAME).join(CONFIG_FILE))
}

/// Loads the configuration from the default location.
///
/// A missing file is not an error: the defaults are returned instead.
pub fn load_default_config() -> Result<ToolConfig, ConfigError> {
    match default_config_path() {
        Some(path) if path.is_file() => load_config(&path),
        _ => Ok(ToolConfig::default()),
    }
}

/// Loads and validates the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<ToolConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ToolConfig, ConfigError> {
    let config: ToolConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are usable.
fn validate_config(config: &ToolConfig) -> Result<(), ConfigError> {
    if config.toolchain.program.trim().is_empty() {
        return Err(ConfigError::MissingField("toolchain.program".to_string()));
    }
    if config.toolchain.module.trim().is_empty() {
        return Err(ConfigError::MissingField("toolchain.module".to_string()));
    }
    if config.cache.ttl_hours == 0 {
        return Err(ConfigError::ValidationError(
            "cache.ttl_hours must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
