//! Reading a source unit from a file or standard input.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::source_unit::SourceUnit;

/// Synthetic origin name for source read from standard input.
pub const STDIN_NAME: &str = "<stdin>";

/// Loads the program from `path`, or from standard input when `path` is `None`.
///
/// The returned unit may be empty; deciding what an empty program means is left
/// to the caller.
pub fn load_source(path: Option<&Path>) -> Result<SourceUnit, SourceError> {
    match path {
        Some(path) => {
            let content = std::fs::read(path).map_err(|e| SourceError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(SourceUnit::new(path, content))
        }
        None => read_source(STDIN_NAME, std::io::stdin().lock()),
    }
}

/// Reads everything from `reader` into a unit named `origin`.
pub fn read_source(origin: &str, mut reader: impl Read) -> Result<SourceUnit, SourceError> {
    let mut content = Vec::new();
    reader
        .read_to_end(&mut content)
        .map_err(|e| SourceError::Read {
            path: PathBuf::from(origin),
            source: e,
        })?;
    Ok(SourceUnit::new(origin, content))
}
