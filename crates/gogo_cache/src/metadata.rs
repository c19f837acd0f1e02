//! Plain-text build metadata stored next to each cached executable.
//!
//! The record is a few `Key: value` lines:
//!
//! ```text
//! Built: 2026-10-19T12:00:00Z
//! Go: go1.22.3
//! Source: e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
//! ```

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use gogo_common::Fingerprint;

use crate::error::CacheError;

const BUILT_KEY: &str = "Built";
const TOOLCHAIN_KEY: &str = "Go";
const SOURCE_KEY: &str = "Source";

/// Build metadata record for one cache entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildMetadata {
    /// When the executable was built.
    pub built_at: DateTime<Utc>,
    /// The toolchain version string that built it, e.g. `go1.22.3`.
    pub toolchain_version: String,
    /// The full fingerprint of the source that was built.
    pub fingerprint: Fingerprint,
}

impl BuildMetadata {
    /// Creates a record stamped with the current time.
    pub fn new(toolchain_version: impl Into<String>, fingerprint: Fingerprint) -> Self {
        Self {
            built_at: Utc::now(),
            toolchain_version: toolchain_version.into(),
            fingerprint,
        }
    }

    /// Serializes the record to its text form.
    pub fn to_text(&self) -> String {
        format!(
            "{BUILT_KEY}: {}\n{TOOLCHAIN_KEY}: {}\n{SOURCE_KEY}: {}\n",
            self.built_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.toolchain_version,
            self.fingerprint,
        )
    }

    /// Parses the text form. Unknown keys are ignored.
    pub fn parse(text: &str) -> Result<Self, CacheError> {
        let mut built_at = None;
        let mut toolchain_version = None;
        let mut fingerprint = None;

        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                BUILT_KEY => {
                    let time = DateTime::parse_from_rfc3339(value)
                        .map_err(|e| parse_error(format!("invalid build time '{value}': {e}")))?;
                    built_at = Some(time.with_timezone(&Utc));
                }
                TOOLCHAIN_KEY => toolchain_version = Some(value.to_string()),
                SOURCE_KEY => {
                    let parsed = value
                        .parse::<Fingerprint>()
                        .map_err(|e| parse_error(e.to_string()))?;
                    fingerprint = Some(parsed);
                }
                _ => {}
            }
        }

        Ok(Self {
            built_at: built_at.ok_or_else(|| missing(BUILT_KEY))?,
            toolchain_version: toolchain_version.ok_or_else(|| missing(TOOLCHAIN_KEY))?,
            fingerprint: fingerprint.ok_or_else(|| missing(SOURCE_KEY))?,
        })
    }

    /// Loads the record at `path`, returning `None` if it is missing or malformed.
    pub fn load(path: &Path) -> Option<Self> {
        let text = std::fs::read_to_string(path).ok()?;
        Self::parse(&text).ok()
    }

    /// Writes the record to `path`.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        std::fs::write(path, self.to_text()).map_err(CacheError::io(path))
    }
}

fn parse_error(reason: String) -> CacheError {
    CacheError::MetadataParse { reason }
}

fn missing(key: &str) -> CacheError {
    parse_error(format!("missing '{key}:' line"))
}
