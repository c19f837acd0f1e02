//! Resolution of the process-wide cache root.

use crate::error::ConfigError;
use crate::types::ToolConfig;
use gogo_common::TOOL_NAME;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the cache root.
pub const CACHE_DIR_ENV: &str = "GOGO_CACHE_DIR";

/// Resolves the cache root for this run.
///
/// Precedence: the `GOGO_CACHE_DIR` environment variable, then `[cache] dir`,
/// then `<platform cache dir>/gogo`. A relative root is anchored at the current
/// directory, since the toolchain later runs from a different one. Called once
/// at startup; the result is passed down rather than recomputed.
pub fn resolve_cache_root(config: &ToolConfig) -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::IoError {
        path: PathBuf::from("."),
        source: e,
    })?;
    resolve_with(config, std::env::var_os(CACHE_DIR_ENV), dirs::cache_dir(), &cwd)
}

fn resolve_with(
    config: &ToolConfig,
    env_override: Option<OsString>,
    platform_dir: Option<PathBuf>,
    cwd: &Path,
) -> Result<PathBuf, ConfigError> {
    let root = if let Some(dir) = env_override.filter(|v| !v.is_empty()) {
        PathBuf::from(dir)
    } else if let Some(dir) = &config.cache.dir {
        dir.clone()
    } else {
        platform_dir
            .map(|dir| dir.join(TOOL_NAME))
            .ok_or(ConfigError::NoCacheDir(CACHE_DIR_ENV))?
    };
    if root.is_absolute() {
        Ok(root)
    } else {
        Ok(cwd.join(root))
    }
}
