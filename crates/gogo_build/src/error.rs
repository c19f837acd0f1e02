//! Error types for building and running programs.

use std::path::PathBuf;
use std::process::ExitStatus;

use gogo_diagnostics::Report;

/// Errors that can occur while building or launching a program.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The scratch workspace could not be created or populated.
    #[error("failed to prepare build workspace at {path}: {source}")]
    Workspace {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The toolchain executable could not be started.
    #[error("failed to run '{program}': {source}")]
    ToolchainUnavailable {
        /// The toolchain program name or path.
        program: String,
        /// The underlying spawn error.
        source: std::io::Error,
    },

    /// The toolchain did not report a usable version.
    #[error("failed to query toolchain version: {reason}")]
    VersionQuery {
        /// What went wrong.
        reason: String,
    },

    /// Dependency resolution exited unsuccessfully. Its output was already shown.
    #[error("dependency resolution failed: {status}")]
    DependencyResolution {
        /// Exit status of the resolution step.
        status: ExitStatus,
    },

    /// The compiler rejected the program.
    #[error("compilation failed")]
    Compilation {
        /// The parsed compiler output.
        report: Report,
    },

    /// The compiler failed without printing anything.
    #[error("build failed: {reason}")]
    ToolFailed {
        /// The raw process failure.
        reason: String,
    },

    /// The compiled executable could not be finalized.
    #[error("failed to finalize executable at {path}: {source}")]
    Artifact {
        /// The executable path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The executable exists but could not be started.
    #[error("failed to launch {path}: {source}")]
    Launch {
        /// The executable path.
        path: PathBuf,
        /// The underlying spawn error.
        source: std::io::Error,
    },
}
