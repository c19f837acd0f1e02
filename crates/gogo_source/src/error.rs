//! Error types for reading and validating source input.

use std::path::PathBuf;

/// Errors that reject a source buffer before it reaches the cache or build stages.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The input file or standard input could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file path, or `<stdin>`.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The input starts with `#!` but the directive line is never terminated.
    #[error("interpreter directive line is not terminated by a newline")]
    MalformedDirective,

    /// The first substantive line is not a `package` clause.
    #[error("code must contain \"package <name>\"")]
    MissingDeclaration,
}
