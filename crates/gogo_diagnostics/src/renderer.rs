//! Terminal rendering of parsed compiler reports.

use crossterm::style::{StyledContent, Stylize};
use gogo_source::SourceUnit;

use crate::diagnostic::{Diagnostic, Report, ReportEntry};

/// Banner printed after a report that contained at least one diagnostic.
pub const FAILURE_BANNER: &str = "Compilation failed";

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic, with an excerpt from `source` when available.
    fn render(&self, diag: &Diagnostic, source: Option<&SourceUnit>) -> String;

    /// Renders a whole report in order, followed by the failure banner if the
    /// report held any structured diagnostic.
    fn render_report(&self, report: &Report, source: Option<&SourceUnit>) -> String {
        let mut out = String::new();
        for entry in &report.entries {
            match entry {
                ReportEntry::Diagnostic(diag) => {
                    out.push_str(&self.render(diag, source));
                    out.push('\n');
                }
                ReportEntry::Passthrough(line) => {
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        if report.has_diagnostics() {
            out.push('\n');
            out.push_str(&self.banner());
            out.push('\n');
        }
        out
    }

    /// Returns the terminal failure banner line.
    fn banner(&self) -> String {
        FAILURE_BANNER.to_string()
    }
}

/// Renders diagnostics as indented blocks with a three-line source excerpt.
///
/// Produces output like:
/// ```text
/// undefined
///    main.go:10:5
///    foo
///     9 | func main() {
///   → 10 |     foo()
///    11 | }
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint<'a>(
        &self,
        text: &'a str,
        style: impl FnOnce(&'a str) -> StyledContent<&'a str>,
    ) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn excerpt(&self, source: &SourceUnit, error_line: u32) -> String {
        let error_line = error_line as usize;
        if error_line < 1 || error_line > source.line_count() {
            return String::new();
        }
        let first = error_line.saturating_sub(1).max(1);
        let last = (error_line + 1).min(source.line_count());
        let width = last.to_string().len();

        let mut out = String::new();
        for num in first..=last {
            let text = source.line(num).unwrap_or_default();
            let gutter = if num == error_line {
                format!("  → {num:>width$} | ")
            } else {
                format!("    {num:>width$} | ")
            };
            out.push_str(&self.paint(&gutter, |s| s.dark_grey()));
            out.push_str(&self.paint(&text, |s| s.white()));
            out.push('\n');
        }
        out
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source: Option<&SourceUnit>) -> String {
        let mut out = String::new();

        out.push_str(&self.paint(diag.category.as_str(), |s| s.red().bold().underlined()));
        out.push('\n');

        let line = diag.line.to_string();
        let column = format!(":{}", diag.column);
        out.push_str("   ");
        out.push_str(&self.paint(&diag.file, |s| s.cyan()));
        out.push(':');
        out.push_str(&self.paint(&line, |s| s.yellow().bold()));
        out.push_str(&self.paint(&column, |s| s.dark_grey()));
        out.push('\n');

        out.push_str("   ");
        out.push_str(&self.paint(&diag.description, |s| s.red()));
        out.push('\n');

        if let Some(source) = source.filter(|s| !s.is_empty()) {
            out.push_str(&self.excerpt(source, diag.line));
        }

        out
    }

    fn banner(&self) -> String {
        self.paint(FAILURE_BANNER, |s| s.red())
    }
}
