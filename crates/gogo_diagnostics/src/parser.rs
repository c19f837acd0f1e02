//! Line grammar for compiler output.
//!
//! A diagnostic line has the shape `file:line:column: message` where `line` and
//! `column` are non-empty runs of ASCII digits and `message` is non-empty. The
//! file name is greedy: when several splits are possible the rightmost
//! `:line:column:` wins, so file names may themselves contain colons (Windows
//! drive letters, for instance).

use crate::category::Category;
use crate::diagnostic::{Diagnostic, Report, ReportEntry};

/// Parses raw compiler stderr into an ordered report.
///
/// Blank lines are dropped; every other line becomes either a structured
/// diagnostic or a passthrough entry holding the trimmed line.
pub fn parse(raw: &str) -> Report {
    let entries = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match parse_line(line) {
            Some(diag) => ReportEntry::Diagnostic(diag),
            None => ReportEntry::Passthrough(line.to_string()),
        })
        .collect();
    Report { entries }
}

/// Parses a single trimmed line, returning `None` if it does not match the grammar.
pub fn parse_line(line: &str) -> Option<Diagnostic> {
    for (idx, _) in line.match_indices(':').rev() {
        let rest = &line[idx + 1..];
        if rest.is_empty() {
            continue;
        }
        let mut fields = line[..idx].rsplitn(3, ':');
        let (Some(column), Some(line_no), Some(file)) = (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        if file.is_empty() || !is_digits(line_no) || !is_digits(column) {
            continue;
        }

        let (category, description) = split_category(rest.trim_start());
        return Some(Diagnostic {
            file: file.to_string(),
            line: line_no.parse().unwrap_or(0),
            column: column.to_string(),
            category,
            description,
        });
    }
    None
}

/// Splits `message` at its first colon when the prefix is a known category token.
fn split_category(message: &str) -> (Category, String) {
    if let Some(idx) = message.find(':').filter(|idx| *idx > 0) {
        if let Some(category) = Category::from_token(&message[..idx]) {
            return (category, message[idx + 1..].trim().to_string());
        }
    }
    (Category::Error, message.to_string())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
