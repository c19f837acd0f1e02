//! Configuration types deserialized from `config.toml`.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default toolchain executable.
pub const DEFAULT_PROGRAM: &str = "go";

/// Default module path written to the synthesized module descriptor.
pub const DEFAULT_MODULE: &str = "gogo-main";

/// Default freshness window for cached builds: three days.
pub const DEFAULT_TTL_HOURS: u64 = 72;

/// The top-level tool configuration.
///
/// Every section is optional; an empty file is equivalent to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Which toolchain to invoke and how to describe the synthesized module.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    /// Where builds are cached and how long they stay fresh.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Toolchain invocation settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    /// The toolchain executable, looked up on `PATH` if not absolute.
    #[serde(default = "default_program")]
    pub program: String,
    /// The module path written to `go.mod`.
    #[serde(default = "default_module")]
    pub module: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            module: default_module(),
        }
    }
}

/// Build cache settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Hours a cached build stays fresh before it is rebuilt.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Cache root overriding the platform cache directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Returns the freshness window as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(60 * 60))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            dir: None,
        }
    }
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_module() -> String {
    DEFAULT_MODULE.to_string()
}

fn default_ttl_hours() -> u64 {
    DEFAULT_TTL_HOURS
}
