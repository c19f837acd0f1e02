//! Compiling and running Go programs through the external toolchain.
//!
//! A [`Builder`] materializes a throwaway [`BuildWorkspace`] holding a
//! synthesized `go.mod` and the program as `main.go`, resolves dependencies,
//! compiles to a caller-chosen output path and parses any compiler errors into
//! a diagnostic [`Report`](gogo_diagnostics::Report). The toolchain itself sits
//! behind the [`Toolchain`] trait; [`GoToolchain`] drives the real `go` binary.

#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod runner;
pub mod toolchain;
pub mod workspace;

pub use builder::{BuildOutput, BuildStage, Builder};
pub use error::BuildError;
pub use runner::{exit_code, run_executable};
pub use toolchain::{CompileOutput, GoToolchain, Toolchain};
pub use workspace::{module_descriptor, short_version, BuildWorkspace, MAIN_FILE, MODULE_FILE};
