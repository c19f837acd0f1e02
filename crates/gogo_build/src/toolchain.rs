//! The toolchain seam and its `go` command implementation.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::error::BuildError;

/// Result of one compiler invocation.
#[derive(Clone, Debug)]
pub struct CompileOutput {
    /// Exit status of the compiler.
    pub status: ExitStatus,
    /// Everything the compiler wrote to standard error.
    pub stderr: String,
}

/// Operations the build pipeline needs from a toolchain.
///
/// Every method that takes a `workspace` runs with it as the working directory.
pub trait Toolchain {
    /// Returns the toolchain's version string, e.g. `go1.22.3`.
    fn version(&self) -> Result<String, BuildError>;

    /// Resolves the workspace's dependencies, streaming diagnostics to stderr.
    fn resolve_dependencies(&self, workspace: &Path) -> Result<(), BuildError>;

    /// Compiles the workspace to `output`, capturing standard error in full.
    fn compile(&self, workspace: &Path, output: &Path) -> Result<CompileOutput, BuildError>;

    /// Compiles and runs the workspace without keeping an executable.
    ///
    /// All three standard streams are inherited.
    fn run_direct(&self, workspace: &Path) -> Result<ExitStatus, BuildError>;
}

/// The `go` command line toolchain.
#[derive(Clone, Debug)]
pub struct GoToolchain {
    program: String,
}

impl GoToolchain {
    /// Creates a toolchain that invokes `program` (normally `go`).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, workspace: &Path, args: &[&str]) -> Command {
        debug!(program = %self.program, ?args, workspace = %workspace.display(), "invoking toolchain");
        let mut cmd = Command::new(&self.program);
        cmd.args(args).current_dir(workspace);
        cmd
    }

    fn unavailable(&self) -> impl FnOnce(std::io::Error) -> BuildError + '_ {
        move |source| BuildError::ToolchainUnavailable {
            program: self.program.clone(),
            source,
        }
    }
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new("go")
    }
}

impl Toolchain for GoToolchain {
    fn version(&self) -> Result<String, BuildError> {
        let output = Command::new(&self.program)
            .args(["env", "GOVERSION"])
            .stdin(Stdio::null())
            .output()
            .map_err(self.unavailable())?;
        if !output.status.success() {
            return Err(BuildError::VersionQuery {
                reason: format!(
                    "{} ({})",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            return Err(BuildError::VersionQuery {
                reason: "empty GOVERSION".to_string(),
            });
        }
        debug!(%version, "toolchain version");
        Ok(version)
    }

    fn resolve_dependencies(&self, workspace: &Path) -> Result<(), BuildError> {
        let status = self
            .command(workspace, &["mod", "tidy"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .map_err(self.unavailable())?;
        if status.success() {
            Ok(())
        } else {
            Err(BuildError::DependencyResolution { status })
        }
    }

    fn compile(&self, workspace: &Path, output: &Path) -> Result<CompileOutput, BuildError> {
        let output_arg = output.to_string_lossy().into_owned();
        let result = self
            .command(workspace, &["build", "-o", output_arg.as_str(), "."])
            .stdin(Stdio::null())
            .output()
            .map_err(self.unavailable())?;
        Ok(CompileOutput {
            status: result.status,
            stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
        })
    }

    fn run_direct(&self, workspace: &Path) -> Result<ExitStatus, BuildError> {
        self.command(workspace, &["run", "."])
            .status()
            .map_err(self.unavailable())
    }
}
