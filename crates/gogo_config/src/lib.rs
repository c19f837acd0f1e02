//! Tool configuration and the immutable per-invocation run configuration.
//!
//! [`ToolConfig`] is read from an optional `config.toml` and controls which
//! toolchain is invoked and where and for how long builds are cached.
//! [`RunConfig`] captures the CLI flags of one invocation and is threaded
//! explicitly through the run pipeline.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod run;
pub mod types;

pub use error::ConfigError;
pub use loader::{default_config_path, load_config, load_config_from_str, load_default_config};
pub use resolve::{resolve_cache_root, CACHE_DIR_ENV};
pub use run::{Action, RunConfig, RunMode};
pub use types::*;
