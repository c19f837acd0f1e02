//! Launching a compiled program.

use std::path::Path;
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::error::BuildError;

/// Runs the executable at `path` with inherited standard streams and waits for it.
///
/// The exit status is returned unchanged; a non-zero status is not an error.
pub fn run_executable(path: &Path) -> Result<ExitStatus, BuildError> {
    debug!(executable = %path.display(), "running program");
    Command::new(path)
        .status()
        .map_err(|e| BuildError::Launch {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Maps a program's exit status to the process exit code to report.
///
/// A program terminated by a signal reports `1`.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
