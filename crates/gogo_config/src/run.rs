//! Immutable description of one invocation.

use std::path::PathBuf;

/// Whether compiled artifacts are cached for this run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Reuse a fresh cached build or build into the cache.
    #[default]
    Cached,
    /// Build and run in a scratch workspace without touching the cache.
    Once,
}

/// What the invocation should do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Compile and run a program read from `input`, or from stdin if `None`.
    Run {
        /// Path of the source file.
        input: Option<PathBuf>,
    },
    /// Delete the entire cache namespace.
    ClearCache,
    /// Print the version string.
    PrintVersion,
}

/// Settings for one invocation, built once from CLI flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// The requested action.
    pub action: Action,
    /// Cached or one-shot execution.
    pub mode: RunMode,
    /// Suppress progress lines.
    pub quiet: bool,
    /// Print debug-level logs.
    pub verbose: bool,
    /// Use ANSI colors in diagnostic output.
    pub color: bool,
}

impl RunConfig {
    /// Creates a run configuration for `action` with default flags.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            mode: RunMode::default(),
            quiet: false,
            verbose: false,
            color: false,
        }
    }

    /// Returns `true` if builds from this run should be cached.
    pub fn caching(&self) -> bool {
        self.mode == RunMode::Cached
    }
}
