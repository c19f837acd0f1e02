//! Interpreter-directive stripping and structural validation.

use crate::error::SourceError;
use crate::source_unit::SourceUnit;

/// The two-byte marker that opens an interpreter directive line.
pub const DIRECTIVE_MARKER: &[u8; 2] = b"#!";

/// Keyword that must open the first substantive line of a program.
const DECLARATION_KEYWORD: &str = "package ";

/// Prefix of a single-line comment.
const LINE_COMMENT: &str = "//";

/// Removes a leading `#!` line from the unit.
///
/// Returns the unit unchanged (cloned) when it does not start with the marker.
/// Fails with [`SourceError::MalformedDirective`] when the marker is present but
/// no newline follows it, since the directive would swallow the whole program.
pub fn strip_leading_directive(source: &SourceUnit) -> Result<SourceUnit, SourceError> {
    let bytes = source.as_bytes();
    if !bytes.starts_with(DIRECTIVE_MARKER) {
        return Ok(source.clone());
    }
    let newline = bytes[DIRECTIVE_MARKER.len()..]
        .iter()
        .position(|b| *b == b'\n')
        .ok_or(SourceError::MalformedDirective)?;
    Ok(source.slice_from(DIRECTIVE_MARKER.len() + newline + 1))
}

/// Checks that the first substantive line is a `package` clause.
///
/// Blank lines and `//` comment lines are skipped. An input made only of blank
/// and comment lines fails the same way as one that opens with other code.
pub fn validate_structure(source: &SourceUnit) -> Result<(), SourceError> {
    let text = String::from_utf8_lossy(source.as_bytes());
    let first = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with(LINE_COMMENT));
    match first {
        Some(line) if line.starts_with(DECLARATION_KEYWORD) => Ok(()),
        _ => Err(SourceError::MissingDeclaration),
    }
}
