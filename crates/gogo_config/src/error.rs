//! Error types for configuration loading and validation.

use std::path::PathBuf;

/// Errors that can occur when loading or validating the tool configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration {path}: {source}")]
    IoError {
        /// The configuration file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// No cache directory could be determined for this platform.
    #[error("no cache directory available; set {0} or [cache] dir")]
    NoCacheDir(&'static str),
}
