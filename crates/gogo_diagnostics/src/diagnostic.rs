//! Structured diagnostic records and the ordered report that holds them.

use crate::category::Category;

/// A structured record parsed from one line of compiler output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file name exactly as the compiler printed it.
    pub file: String,
    /// The 1-indexed line number. Zero if the digits did not fit in a `u32`.
    pub line: u32,
    /// The column, kept as the compiler's text.
    pub column: String,
    /// The message category.
    pub category: Category,
    /// The message with any category prefix removed.
    pub description: String,
}

/// One entry of a parsed report, in the order the compiler emitted it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportEntry {
    /// A line that matched the `file:line:column: message` grammar.
    Diagnostic(Diagnostic),
    /// A line that did not match, kept verbatim (whitespace-trimmed).
    Passthrough(String),
}

/// All non-blank lines of one compiler run, parsed in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// The parsed entries.
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Returns `true` if at least one entry is a structured diagnostic.
    pub fn has_diagnostics(&self) -> bool {
        self.diagnostics().next().is_some()
    }

    /// Iterates over the structured diagnostics, skipping passthrough lines.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter_map(|entry| match entry {
            ReportEntry::Diagnostic(diag) => Some(diag),
            ReportEntry::Passthrough(_) => None,
        })
    }

    /// Returns `true` if the report holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
