//! Ephemeral build workspaces.

use std::path::Path;

use gogo_source::SourceUnit;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::BuildError;

/// File name of the synthesized module descriptor.
pub const MODULE_FILE: &str = "go.mod";

/// File name the program is written to.
pub const MAIN_FILE: &str = "main.go";

/// Reduces a toolchain version string to `major.minor`.
///
/// `go1.22.3` becomes `1.22`. Strings with fewer than two components are
/// returned without their `go` prefix.
pub fn short_version(version: &str) -> String {
    let version = version.split_whitespace().next().unwrap_or_default();
    let version = version.strip_prefix("go").unwrap_or(version);
    let mut parts = version.split('.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) => format!("{major}.{minor}"),
        _ => version.to_string(),
    }
}

/// Renders the `go.mod` contents for `module` built with toolchain `version`.
pub fn module_descriptor(module: &str, version: &str) -> String {
    format!("module {module}\n\ngo {}\n", short_version(version))
}

/// A scratch directory holding `go.mod` and `main.go` for one build attempt.
///
/// The directory is removed when the workspace is closed or dropped.
#[derive(Debug)]
pub struct BuildWorkspace {
    dir: TempDir,
}

impl BuildWorkspace {
    /// Creates a workspace under the system temp directory and writes the
    /// module descriptor and the program into it.
    pub fn create(
        prefix: &str,
        module: &str,
        toolchain_version: &str,
        source: &SourceUnit,
    ) -> Result<Self, BuildError> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .map_err(|e| BuildError::Workspace {
                path: std::env::temp_dir(),
                source: e,
            })?;
        let workspace = Self { dir };
        workspace.write(MODULE_FILE, module_descriptor(module, toolchain_version).as_bytes())?;
        workspace.write(MAIN_FILE, source.as_bytes())?;
        debug!(workspace = %workspace.path().display(), "created build workspace");
        Ok(workspace)
    }

    fn write(&self, name: &str, contents: &[u8]) -> Result<(), BuildError> {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).map_err(|e| BuildError::Workspace { path, source: e })
    }

    /// The workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the workspace, logging rather than failing if removal fails.
    pub fn close(self) {
        let path = self.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(workspace = %path.display(), "removed build workspace"),
            Err(e) => warn!("failed to remove build workspace {}: {e}", path.display()),
        }
    }
}
