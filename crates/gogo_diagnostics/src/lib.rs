//! Parsing and rendering of Go toolchain diagnostics.
//!
//! Raw compiler stderr is split into lines and matched against the
//! `file:line:column: message` grammar by [`parse`]. Each matching line becomes a
//! structured [`Diagnostic`]; anything else is kept as a passthrough line so no
//! compiler output is lost. A [`DiagnosticRenderer`] then formats the resulting
//! [`Report`] with source excerpts for the terminal.

#![warn(missing_docs)]

pub mod category;
pub mod diagnostic;
pub mod parser;
pub mod renderer;

pub use category::Category;
pub use diagnostic::{Diagnostic, Report, ReportEntry};
pub use parser::{parse, parse_line};
pub use renderer::{DiagnosticRenderer, TerminalRenderer, FAILURE_BANNER};
