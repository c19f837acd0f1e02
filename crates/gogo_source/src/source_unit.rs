//! Source unit representation with line-start indexing for excerpt lookup.

use gogo_common::Fingerprint;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// One compilable Go program, held as raw bytes.
///
/// Stores the content along with precomputed line-start offsets so diagnostic
/// rendering can pull individual lines without rescanning the buffer. A unit is
/// never mutated; normalization produces a new unit from a slice of the old one.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    /// Where the bytes came from: a file path or a synthetic `<stdin>` name.
    origin: PathBuf,
    /// The raw program bytes.
    content: Vec<u8>,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<usize>,
}

impl SourceUnit {
    /// Creates a new unit with precomputed line starts.
    pub fn new(origin: impl Into<PathBuf>, content: Vec<u8>) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            origin: origin.into(),
            content,
            line_starts,
        }
    }

    /// Returns the path or synthetic name this unit was read from.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Returns `true` if the unit holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the number of lines, counting a trailing empty line after a final newline.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the text of the 1-indexed line `line`, without its terminator.
    ///
    /// Returns `None` when `line` is 0 or past the last line.
    pub fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        let idx = line.checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.content.len(), |next| next - 1);
        let mut bytes = &self.content[start..end];
        if let Some(stripped) = bytes.strip_suffix(b"\r") {
            bytes = stripped;
        }
        Some(String::from_utf8_lossy(bytes))
    }

    /// Computes the content fingerprint used as cache identity.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from_bytes(&self.content)
    }

    /// Derives a new unit from the bytes starting at `offset`, keeping the origin.
    pub(crate) fn slice_from(&self, offset: usize) -> Self {
        Self::new(self.origin.clone(), self.content[offset..].to_vec())
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, byte) in content.iter().enumerate() {
        if *byte == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}
