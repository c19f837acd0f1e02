//! Typed descriptor of one cache entry's on-disk layout.

use std::path::{Path, PathBuf};

use gogo_common::Fingerprint;

/// File name of the compiled executable inside an entry.
pub const ARTIFACT_NAME: &str = if cfg!(windows) { "run.exe" } else { "run" };

/// File name of the persisted source copy inside an entry.
pub const SOURCE_FILE: &str = "main.go";

/// File name of the build metadata record inside an entry.
pub const METADATA_FILE: &str = "meta.txt";

const STAGING_SUFFIX: &str = ".partial";

fn staging_name(pid: u32) -> String {
    format!(".{ARTIFACT_NAME}.{pid}{STAGING_SUFFIX}")
}

/// Returns `true` if `name` is the staging file name of some process.
pub(crate) fn is_staging_name(name: &str) -> bool {
    name.strip_prefix('.')
        .and_then(|rest| rest.strip_prefix(ARTIFACT_NAME))
        .and_then(|rest| rest.strip_prefix('.'))
        .and_then(|rest| rest.strip_suffix(STAGING_SUFFIX))
        .is_some_and(|pid| !pid.is_empty() && pid.bytes().all(|b| b.is_ascii_digit()))
}

/// Paths making up one cache entry.
///
/// Deriving a descriptor never touches the disk. Callers go through these
/// accessors rather than joining paths themselves, so the layout can change in
/// one place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    fingerprint: Fingerprint,
    dir: PathBuf,
    source_path: PathBuf,
    artifact_path: PathBuf,
    staging_path: PathBuf,
    metadata_path: PathBuf,
}

impl CacheEntry {
    /// Derives the entry for `fingerprint` under the cache `root`.
    pub fn new(root: &Path, fingerprint: Fingerprint) -> Self {
        let dir = root.join(fingerprint.short());
        Self {
            fingerprint,
            source_path: dir.join(SOURCE_FILE),
            artifact_path: dir.join(ARTIFACT_NAME),
            // Per-process so concurrent builders never write the same file.
            staging_path: dir.join(staging_name(std::process::id())),
            metadata_path: dir.join(METADATA_FILE),
            dir,
        }
    }

    /// The full fingerprint of the source this entry caches.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// The entry directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The persisted source copy.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The executable served on a cache hit.
    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Where a build writes the executable before it is committed.
    pub fn staging_path(&self) -> &Path {
        &self.staging_path
    }

    /// The metadata record.
    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }
}
