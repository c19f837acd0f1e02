//! The cached and no-cache run pipelines.
//!
//! Normalizer, fingerprint, cache lookup, then either the cached executable is
//! run directly or the program is built into the cache and run from there.

use std::error::Error;
use std::path::Path;
use std::process::ExitStatus;

use crossterm::style::Stylize;
use gogo_build::{exit_code, run_executable, BuildError, BuildStage, Builder, GoToolchain, Toolchain};
use gogo_cache::{BuildMetadata, CacheStore, Lookup};
use gogo_config::{resolve_cache_root, RunConfig, RunMode, ToolConfig};
use gogo_diagnostics::{DiagnosticRenderer, TerminalRenderer};
use gogo_source::{load_source, strip_leading_directive, validate_structure, SourceError, SourceUnit};
use tracing::debug;

/// Usage text printed when no program was supplied.
pub const USAGE: &str = "Usage: echo 'code' | gogo\n       gogo file.go\nFlags: --once (no cache), --clear (clean cache), --ver (version)";

/// Prints user-facing progress lines to stderr unless quiet.
#[derive(Clone, Copy, Debug)]
pub struct Progress {
    quiet: bool,
    color: bool,
}

impl Progress {
    /// Creates a progress printer from the run flags.
    pub fn new(config: &RunConfig) -> Self {
        Self {
            quiet: config.quiet,
            color: config.color,
        }
    }

    /// Prints `message` on its own line.
    pub fn say(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            eprintln!("{}", message.yellow());
        } else {
            eprintln!("{message}");
        }
    }

    fn stage(&self, mode: RunMode, stage: BuildStage) {
        self.say(stage_message(mode, stage));
    }
}

/// The progress line for `stage` of a build in `mode`.
pub fn stage_message(mode: RunMode, stage: BuildStage) -> &'static str {
    match (mode, stage) {
        (RunMode::Cached, BuildStage::ResolvingDependencies) => {
            "First run: downloading dependencies..."
        }
        (RunMode::Once, BuildStage::ResolvingDependencies) => "Checking dependencies...",
        (_, BuildStage::Compiling) => "Building...",
        (_, BuildStage::RunningDirect) => "Running without cache...",
    }
}

/// Strips an interpreter line and checks for a package clause.
///
/// Returns `None` for empty input, which the caller answers with usage text.
pub fn prepare_source(unit: SourceUnit) -> Result<Option<SourceUnit>, SourceError> {
    if unit.is_empty() {
        return Ok(None);
    }
    let unit = strip_leading_directive(&unit)?;
    validate_structure(&unit)?;
    Ok(Some(unit))
}

/// Loads, prepares and runs the program at `input` (stdin when `None`).
///
/// Returns the process exit code. Compiler diagnostics are rendered to stderr
/// before the compilation error is returned.
pub fn run_program(
    input: Option<&Path>,
    config: &RunConfig,
    tool: &ToolConfig,
) -> Result<i32, Box<dyn Error>> {
    let Some(source) = prepare_source(load_source(input)?)? else {
        eprintln!("{USAGE}");
        return Ok(1);
    };

    let toolchain = GoToolchain::new(tool.toolchain.program.as_str());
    let progress = Progress::new(config);
    let result = if config.caching() {
        let store = CacheStore::new(resolve_cache_root(tool)?, tool.cache.ttl());
        run_cached(&source, &store, &toolchain, &tool.toolchain.module, progress)
    } else {
        run_once(&source, &toolchain, &tool.toolchain.module, progress)
    };

    match result {
        Ok(status) => Ok(exit_code(status)),
        Err(e) => {
            if let Some(BuildError::Compilation { report }) = e.downcast_ref::<BuildError>() {
                let renderer = TerminalRenderer::new(config.color);
                eprint!("{}", renderer.render_report(report, Some(&source)));
            }
            Err(e)
        }
    }
}

/// Runs `source` from the cache, building it first on a miss.
///
/// A failed build leaves no entry behind for this fingerprint.
pub fn run_cached<T: Toolchain>(
    source: &SourceUnit,
    store: &CacheStore,
    toolchain: &T,
    module: &str,
    progress: Progress,
) -> Result<ExitStatus, Box<dyn Error>> {
    let entry = store.locate(source.fingerprint());
    match store.lookup(&entry) {
        Lookup::Hit(artifact) => {
            progress.say("Using cached binary");
            return Ok(run_executable(&artifact)?);
        }
        Lookup::Miss(reason) => debug!(?reason, "building"),
    }

    let pending = store.prepare(&entry)?;
    let built = Builder::new(toolchain, module)
        .with_progress(|stage| progress.stage(RunMode::Cached, stage))
        .build(source, pending.staging_path())?;
    let metadata = BuildMetadata::new(built.toolchain_version, *pending.entry().fingerprint());
    let artifact = pending.commit(source.as_bytes(), &metadata)?;

    Ok(run_executable(&artifact)?)
}

/// Runs `source` through the toolchain directly without touching the cache.
pub fn run_once<T: Toolchain>(
    source: &SourceUnit,
    toolchain: &T,
    module: &str,
    progress: Progress,
) -> Result<ExitStatus, Box<dyn Error>> {
    let status = Builder::new(toolchain, module)
        .with_progress(|stage| progress.stage(RunMode::Once, stage))
        .run_once(source)?;
    Ok(status)
}

/// Deletes the whole cache namespace. Returns the exit code.
pub fn clear_cache(tool: &ToolConfig) -> i32 {
    let cleared = resolve_cache_root(tool)
        .map_err(|e| e.to_string())
        .and_then(|root| {
            CacheStore::new(root, tool.cache.ttl())
                .clear_all()
                .map_err(|e| e.to_string())
        });
    match cleared {
        Ok(()) => {
            println!("Cache cleared!");
            0
        }
        Err(e) => {
            eprintln!("Failed to clear cache: {e}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gogo_config::Action;

    fn quiet() -> Progress {
        Progress {
            quiet: true,
            color: false,
        }
    }

    fn unit(text: &str) -> SourceUnit {
        SourceUnit::new("main.go", text.as_bytes().to_vec())
    }

    #[test]
    fn empty_input_means_usage() {
        assert!(prepare_source(unit("")).unwrap().is_none());
    }

    #[test]
    fn directive_is_stripped_before_validation() {
        let prepared = prepare_source(unit("#!/usr/bin/env gogo\npackage main\n"))
            .unwrap()
            .unwrap();
        assert_eq!(prepared.as_bytes(), b"package main\n");
    }

    #[test]
    fn missing_package_is_rejected() {
        assert!(matches!(
            prepare_source(unit("func main() {}\n")),
            Err(SourceError::MissingDeclaration)
        ));
    }

    #[test]
    fn unterminated_directive_is_rejected() {
        assert!(matches!(
            prepare_source(unit("#!/usr/bin/env gogo")),
            Err(SourceError::MalformedDirective)
        ));
    }

    #[test]
    fn stage_messages() {
        assert_eq!(
            stage_message(RunMode::Cached, BuildStage::ResolvingDependencies),
            "First run: downloading dependencies..."
        );
        assert_eq!(
            stage_message(RunMode::Once, BuildStage::ResolvingDependencies),
            "Checking dependencies..."
        );
        assert_eq!(stage_message(RunMode::Cached, BuildStage::Compiling), "Building...");
        assert_eq!(
            stage_message(RunMode::Once, BuildStage::RunningDirect),
            "Running without cache..."
        );
    }

    #[test]
    fn progress_respects_quiet() {
        let config = RunConfig {
            quiet: true,
            ..RunConfig::new(Action::Run { input: None })
        };
        assert!(Progress::new(&config).quiet);
    }

    #[test]
    fn clear_cache_removes_configured_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("gogo");
        std::fs::create_dir_all(root.join("0123456789abcdef")).unwrap();
        let mut tool = ToolConfig::default();
        tool.cache.dir = Some(root.clone());

        // The environment override would take precedence over the config dir.
        if std::env::var_os(gogo_config::CACHE_DIR_ENV).is_none() {
            assert_eq!(clear_cache(&tool), 0);
            assert!(!root.exists());
        }
    }

    #[cfg(unix)]
    mod end_to_end {
        use super::*;
        use gogo_build::CompileOutput;
        use gogo_cache::MissReason;
        use std::cell::Cell;
        use std::os::unix::process::ExitStatusExt;
        use std::time::{Duration, SystemTime};

        /// Counts toolchain invocations and compiles every program to a script
        /// exiting with `exit`.
        struct CountingToolchain {
            exit: i32,
            resolve_ok: bool,
            resolves: Cell<u32>,
            compiles: Cell<u32>,
            stderr: &'static str,
        }

        impl CountingToolchain {
            fn new(exit: i32) -> Self {
                Self {
                    exit,
                    resolve_ok: true,
                    resolves: Cell::new(0),
                    compiles: Cell::new(0),
                    stderr: "",
                }
            }

            fn failing(stderr: &'static str) -> Self {
                Self {
                    stderr,
                    ..Self::new(0)
                }
            }

            fn unresolvable() -> Self {
                Self {
                    resolve_ok: false,
                    ..Self::new(0)
                }
            }
        }

        impl Toolchain for CountingToolchain {
            fn version(&self) -> Result<String, BuildError> {
                Ok("go1.22.3".to_string())
            }

            fn resolve_dependencies(&self, _workspace: &Path) -> Result<(), BuildError> {
                self.resolves.set(self.resolves.get() + 1);
                if self.resolve_ok {
                    Ok(())
                } else {
                    Err(BuildError::DependencyResolution {
                        status: ExitStatus::from_raw(1 << 8),
                    })
                }
            }

            fn compile(&self, _workspace: &Path, output: &Path) -> Result<CompileOutput, BuildError> {
                self.compiles.set(self.compiles.get() + 1);
                if !self.stderr.is_empty() {
                    return Ok(CompileOutput {
                        status: ExitStatus::from_raw(1 << 8),
                        stderr: self.stderr.to_string(),
                    });
                }
                std::fs::write(output, format!("#!/bin/sh\nexit {}\n", self.exit)).unwrap();
                Ok(CompileOutput {
                    status: ExitStatus::from_raw(0),
                    stderr: String::new(),
                })
            }

            fn run_direct(&self, _workspace: &Path) -> Result<ExitStatus, BuildError> {
                Ok(ExitStatus::from_raw(self.exit << 8))
            }
        }

        fn store(dir: &tempfile::TempDir) -> CacheStore {
            CacheStore::new(dir.path().join("gogo"), Duration::from_secs(72 * 3600))
        }

        #[test]
        fn second_run_skips_build() {
            let dir = tempfile::tempdir().unwrap();
            let store = store(&dir);
            let toolchain = CountingToolchain::new(0);
            let source = unit("package main\n\nfunc main() {}\n");

            let first = run_cached(&source, &store, &toolchain, "gogo-main", quiet()).unwrap();
            assert!(first.success());
            assert_eq!(toolchain.resolves.get(), 1);
            assert_eq!(toolchain.compiles.get(), 1);

            let second = run_cached(&source, &store, &toolchain, "gogo-main", quiet()).unwrap();
            assert!(second.success());
            assert_eq!(toolchain.resolves.get(), 1);
            assert_eq!(toolchain.compiles.get(), 1);
        }

        #[test]
        fn cached_entry_has_source_and_metadata() {
            let dir = tempfile::tempdir().unwrap();
            let store = store(&dir);
            let toolchain = CountingToolchain::new(0);
            let source = unit("package main\n\nfunc main() {}\n");

            run_cached(&source, &store, &toolchain, "gogo-main", quiet()).unwrap();

            let entry = store.locate(source.fingerprint());
            assert_eq!(std::fs::read(entry.source_path()).unwrap(), source.as_bytes());
            let meta = BuildMetadata::load(entry.metadata_path()).unwrap();
            assert_eq!(meta.toolchain_version, "go1.22.3");
            assert_eq!(meta.fingerprint, source.fingerprint());
        }

        #[test]
        fn program_status_is_propagated() {
            let dir = tempfile::tempdir().unwrap();
            let toolchain = CountingToolchain::new(5);
            let status = run_cached(
                &unit("package main\n"),
                &store(&dir),
                &toolchain,
                "gogo-main",
                quiet(),
            )
            .unwrap();
            assert_eq!(exit_code(status), 5);
        }

        #[test]
        fn compile_failure_leaves_no_entry() {
            let dir = tempfile::tempdir().unwrap();
            let store = store(&dir);
            let toolchain = CountingToolchain::failing("./main.go:1:1: syntax error: unexpected x\n");
            let source = unit("package main\nx\n");

            let err = run_cached(&source, &store, &toolchain, "gogo-main", quiet()).unwrap_err();

            assert!(matches!(
                err.downcast_ref::<BuildError>(),
                Some(BuildError::Compilation { .. })
            ));
            let entry = store.locate(source.fingerprint());
            assert!(!entry.dir().exists());
            assert_eq!(store.lookup(&entry), Lookup::Miss(MissReason::Absent));
        }

        #[test]
        fn stale_entry_is_rebuilt() {
            let dir = tempfile::tempdir().unwrap();
            let store = store(&dir);
            let toolchain = CountingToolchain::new(0);
            let source = unit("package main\n\nfunc main() {}\n");

            run_cached(&source, &store, &toolchain, "gogo-main", quiet()).unwrap();
            let entry = store.locate(source.fingerprint());
            std::fs::write(entry.artifact_path(), "#!/bin/sh\nexit 9\n").unwrap();
            std::fs::File::options()
                .write(true)
                .open(entry.artifact_path())
                .unwrap()
                .set_modified(SystemTime::now() - Duration::from_secs(73 * 3600))
                .unwrap();
            assert_eq!(store.lookup(&entry), Lookup::Miss(MissReason::Stale));

            let status = run_cached(&source, &store, &toolchain, "gogo-main", quiet()).unwrap();

            assert!(status.success());
            assert_eq!(toolchain.resolves.get(), 2);
            assert_eq!(toolchain.compiles.get(), 2);
            assert_eq!(
                std::fs::read_to_string(entry.artifact_path()).unwrap(),
                "#!/bin/sh\nexit 0\n"
            );
            assert_eq!(store.lookup(&entry), Lookup::Hit(entry.artifact_path().to_path_buf()));
        }

        #[test]
        fn resolution_failure_leaves_no_entry() {
            let dir = tempfile::tempdir().unwrap();
            let store = store(&dir);
            let toolchain = CountingToolchain::unresolvable();
            let source = unit("package main\n\nimport \"example.com/missing\"\n");

            let err = run_cached(&source, &store, &toolchain, "gogo-main", quiet()).unwrap_err();

            assert!(matches!(
                err.downcast_ref::<BuildError>(),
                Some(BuildError::DependencyResolution { .. })
            ));
            assert_eq!(toolchain.resolves.get(), 1);
            assert_eq!(toolchain.compiles.get(), 0);
            assert!(!store.locate(source.fingerprint()).dir().exists());
        }

        #[test]
        fn once_mode_never_touches_cache() {
            let dir = tempfile::tempdir().unwrap();
            let store = store(&dir);
            let toolchain = CountingToolchain::new(2);

            let status = run_once(&unit("package main\n"), &toolchain, "gogo-main", quiet()).unwrap();

            assert_eq!(status.code(), Some(2));
            assert_eq!(toolchain.compiles.get(), 0);
            assert!(!store.root().exists());
        }
    }
}
