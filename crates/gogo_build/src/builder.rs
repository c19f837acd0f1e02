//! Build orchestration: workspace, dependency resolution, compilation.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use gogo_common::make_executable;
use gogo_diagnostics::parse;
use gogo_source::SourceUnit;
use tracing::debug;

use crate::error::BuildError;
use crate::toolchain::Toolchain;
use crate::workspace::BuildWorkspace;

const BUILD_PREFIX: &str = "gogo-build-";
const ONCE_PREFIX: &str = "gogo-once-";

/// Progress points reported while a build runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildStage {
    /// Dependency resolution is starting.
    ResolvingDependencies,
    /// Compilation is starting.
    Compiling,
    /// A no-cache run is starting.
    RunningDirect,
}

/// A successful build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOutput {
    /// Where the executable was written.
    pub artifact: PathBuf,
    /// Version string of the toolchain that built it.
    pub toolchain_version: String,
}

/// Drives a [`Toolchain`] through one build or one no-cache run.
///
/// The builder knows nothing about the cache: it only produces, or fails to
/// produce, an executable at the path it is given.
pub struct Builder<'a, T: Toolchain> {
    toolchain: &'a T,
    module: String,
    progress: Option<Box<dyn Fn(BuildStage) + 'a>>,
}

impl<'a, T: Toolchain> Builder<'a, T> {
    /// Creates a builder that names the synthesized module `module`.
    pub fn new(toolchain: &'a T, module: impl Into<String>) -> Self {
        Self {
            toolchain,
            module: module.into(),
            progress: None,
        }
    }

    /// Installs a callback invoked as each stage starts.
    pub fn with_progress(mut self, progress: impl Fn(BuildStage) + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    fn report(&self, stage: BuildStage) {
        if let Some(progress) = &self.progress {
            progress(stage);
        }
    }

    /// Compiles `source` into an executable at `output`.
    ///
    /// Dependency resolution failures stop the build before compilation. When
    /// the compiler fails, its captured stderr is parsed into
    /// [`BuildError::Compilation`]; a failure with no stderr at all becomes
    /// [`BuildError::ToolFailed`]. The workspace is removed as soon as the
    /// compiler exits, whatever the outcome.
    pub fn build(&self, source: &SourceUnit, output: &Path) -> Result<BuildOutput, BuildError> {
        let toolchain_version = self.toolchain.version()?;
        let workspace =
            BuildWorkspace::create(BUILD_PREFIX, &self.module, &toolchain_version, source)?;

        self.report(BuildStage::ResolvingDependencies);
        self.toolchain.resolve_dependencies(workspace.path())?;

        self.report(BuildStage::Compiling);
        let compiled = self.toolchain.compile(workspace.path(), output);
        workspace.close();
        let compiled = compiled?;

        if !compiled.status.success() {
            if compiled.stderr.trim().is_empty() {
                return Err(BuildError::ToolFailed {
                    reason: compiled.status.to_string(),
                });
            }
            let report = parse(&compiled.stderr);
            debug!(entries = report.entries.len(), "compiler reported errors");
            return Err(BuildError::Compilation { report });
        }

        make_executable(output).map_err(|e| BuildError::Artifact {
            path: output.to_path_buf(),
            source: e,
        })?;
        debug!(artifact = %output.display(), "build succeeded");
        Ok(BuildOutput {
            artifact: output.to_path_buf(),
            toolchain_version,
        })
    }

    /// Resolves dependencies and runs `source` directly, keeping no executable.
    ///
    /// Returns the exit status of the toolchain's run command, which reflects
    /// the program's own status.
    pub fn run_once(&self, source: &SourceUnit) -> Result<ExitStatus, BuildError> {
        let toolchain_version = self.toolchain.version()?;
        let workspace =
            BuildWorkspace::create(ONCE_PREFIX, &self.module, &toolchain_version, source)?;

        self.report(BuildStage::ResolvingDependencies);
        self.toolchain.resolve_dependencies(workspace.path())?;

        self.report(BuildStage::RunningDirect);
        let status = self.toolchain.run_direct(workspace.path());
        workspace.close();
        status
    }
}
