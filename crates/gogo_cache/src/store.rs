//! Cache store: lookup with freshness, guarded population, rollback and clear.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use gogo_common::{make_executable, Fingerprint};
use tracing::{debug, warn};

use crate::entry::{is_staging_name, CacheEntry};
use crate::error::CacheError;
use crate::metadata::BuildMetadata;

/// Outcome of looking up an entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// A complete, fresh build exists at this path.
    Hit(PathBuf),
    /// The entry must be (re)built.
    Miss(MissReason),
}

/// Why a lookup did not produce a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissReason {
    /// No executable exists for this fingerprint.
    Absent,
    /// The executable is older than the freshness window.
    Stale,
    /// The executable exists but the metadata record is missing or unreadable.
    Incomplete,
    /// The entry directory belongs to a different source with the same short fingerprint.
    FingerprintMismatch,
}

/// Returns `true` if something modified at `modified` is still fresh at `now`.
///
/// A modification time in the future counts as fresh.
pub fn is_fresh(modified: SystemTime, now: SystemTime, ttl: Duration) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age < ttl,
        Err(_) => true,
    }
}

/// Age after which another process's staging file is treated as abandoned.
const ORPHAN_STAGING_AGE: Duration = Duration::from_secs(60 * 60);

/// The on-disk build cache rooted at a single directory.
///
/// The store is not locked: concurrent invocations building the same
/// fingerprint each write their own staging file and the last rename wins.
pub struct CacheStore {
    root: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    /// Creates a store rooted at `root` with the given freshness window.
    pub fn new(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            root: root.into(),
            ttl,
        }
    }

    /// The cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Derives the entry descriptor for `fingerprint`. Never touches disk.
    pub fn locate(&self, fingerprint: Fingerprint) -> CacheEntry {
        CacheEntry::new(&self.root, fingerprint)
    }

    /// Looks up `entry` against the current time.
    pub fn lookup(&self, entry: &CacheEntry) -> Lookup {
        self.lookup_at(entry, SystemTime::now())
    }

    /// Looks up `entry` as if the current time were `now`.
    ///
    /// A hit needs an executable whose modification time is within the TTL and
    /// a metadata record naming the same full fingerprint. Every other state is
    /// a miss; none of them is an error.
    pub fn lookup_at(&self, entry: &CacheEntry, now: SystemTime) -> Lookup {
        let modified = match std::fs::metadata(entry.artifact_path()).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return self.miss(entry, MissReason::Absent),
        };
        if !is_fresh(modified, now, self.ttl) {
            return self.miss(entry, MissReason::Stale);
        }
        let Some(metadata) = BuildMetadata::load(entry.metadata_path()) else {
            return self.miss(entry, MissReason::Incomplete);
        };
        if metadata.fingerprint != *entry.fingerprint() {
            return self.miss(entry, MissReason::FingerprintMismatch);
        }
        debug!(entry = %entry.dir().display(), "cache hit");
        Lookup::Hit(entry.artifact_path().to_path_buf())
    }

    fn miss(&self, entry: &CacheEntry, reason: MissReason) -> Lookup {
        debug!(entry = %entry.dir().display(), ?reason, "cache miss");
        Lookup::Miss(reason)
    }

    /// Creates the entry directory and returns a guard for populating it.
    ///
    /// The build writes its executable to [`CacheEntry::staging_path`]; the
    /// guard then commits it. Dropping the guard uncommitted removes the whole
    /// entry directory.
    ///
    /// Staging files left by other processes more than an hour ago are
    /// removed first; younger ones may belong to a build still in progress.
    pub fn prepare<'a>(&'a self, entry: &'a CacheEntry) -> Result<PendingEntry<'a>, CacheError> {
        std::fs::create_dir_all(entry.dir()).map_err(CacheError::io(entry.dir()))?;
        sweep_orphans(entry, SystemTime::now());
        Ok(PendingEntry {
            store: self,
            entry,
            committed: false,
        })
    }

    /// Removes the entry directory wholesale. A missing directory is not an error.
    pub fn rollback(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        debug!(entry = %entry.dir().display(), "rolling back cache entry");
        remove_tree(entry.dir())
    }

    /// Removes the whole cache root. A missing root is not an error.
    pub fn clear_all(&self) -> Result<(), CacheError> {
        debug!(root = %self.root.display(), "clearing cache");
        remove_tree(&self.root)
    }
}

fn sweep_orphans(entry: &CacheEntry, now: SystemTime) {
    let Ok(items) = std::fs::read_dir(entry.dir()) else {
        return;
    };
    for item in items.flatten() {
        let path = item.path();
        if path == entry.staging_path() {
            continue;
        }
        if !item.file_name().to_str().is_some_and(is_staging_name) {
            continue;
        }
        let abandoned = item
            .metadata()
            .and_then(|m| m.modified())
            .is_ok_and(|modified| !is_fresh(modified, now, ORPHAN_STAGING_AGE));
        if !abandoned {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(file = %path.display(), "removed abandoned staging file"),
            Err(e) => warn!("failed to remove abandoned staging file {}: {e}", path.display()),
        }
    }
}

fn remove_tree(path: &Path) -> Result<(), CacheError> {
    match std::fs::remove_dir_all(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
        _ => Ok(()),
    }
}

/// An entry directory being populated.
///
/// Holds the invariant that an entry is either complete or absent: unless
/// [`commit`](Self::commit) succeeds, dropping the guard removes the directory.
pub struct PendingEntry<'a> {
    store: &'a CacheStore,
    entry: &'a CacheEntry,
    committed: bool,
}

impl PendingEntry<'_> {
    /// The entry being populated.
    pub fn entry(&self) -> &CacheEntry {
        self.entry
    }

    /// Where the build must write the executable.
    pub fn staging_path(&self) -> &Path {
        self.entry.staging_path()
    }

    /// Persists the source copy and metadata, then publishes the staged executable.
    ///
    /// The executable is renamed into place last, so a concurrent lookup never
    /// sees an executable without its metadata. On error the entry is rolled back.
    pub fn commit(mut self, source: &[u8], metadata: &BuildMetadata) -> Result<PathBuf, CacheError> {
        let entry = self.entry;
        std::fs::write(entry.source_path(), source).map_err(CacheError::io(entry.source_path()))?;
        make_executable(entry.staging_path()).map_err(CacheError::io(entry.staging_path()))?;
        metadata.save(entry.metadata_path())?;
        std::fs::rename(entry.staging_path(), entry.artifact_path())
            .map_err(CacheError::io(entry.artifact_path()))?;

        self.committed = true;
        debug!(entry = %entry.dir().display(), "cache entry committed");
        Ok(entry.artifact_path().to_path_buf())
    }
}

impl Drop for PendingEntry<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = self.store.rollback(self.entry) {
            warn!("failed to remove incomplete cache entry: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ARTIFACT_NAME;

    const TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);

    fn make_store() -> (tempfile::TempDir, CacheStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("gogo"), TTL);
        (dir, store)
    }

    fn commit(store: &CacheStore, source: &[u8]) -> CacheEntry {
        let fp = Fingerprint::from_bytes(source);
        let entry = store.locate(fp);
        let pending = store.prepare(&entry).unwrap();
        std::fs::write(pending.staging_path(), b"#!/bin/sh\nexit 0\n").unwrap();
        pending
            .commit(source, &BuildMetadata::new("go1.22.3", fp))
            .unwrap();
        entry
    }

    fn artifact_mtime(entry: &CacheEntry) -> SystemTime {
        std::fs::metadata(entry.artifact_path())
            .unwrap()
            .modified()
            .unwrap()
    }

    #[test]
    fn fresh_boundary() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let eps = Duration::from_secs(1);
        assert!(is_fresh(t, t + TTL - eps, TTL));
        assert!(!is_fresh(t, t + TTL, TTL));
        assert!(!is_fresh(t, t + TTL + eps, TTL));
        assert!(is_fresh(t, t - eps, TTL));
    }

    #[test]
    fn absent_entry_misses() {
        let (_dir, store) = make_store();
        let entry = store.locate(Fingerprint::from_bytes(b"package main\n"));
        assert_eq!(store.lookup(&entry), Lookup::Miss(MissReason::Absent));
    }

    #[test]
    fn committed_entry_hits() {
        let (_dir, store) = make_store();
        let entry = commit(&store, b"package main\n");

        assert_eq!(
            store.lookup(&entry),
            Lookup::Hit(entry.artifact_path().to_path_buf())
        );
        assert_eq!(
            std::fs::read(entry.source_path()).unwrap(),
            b"package main\n"
        );
        assert!(!entry.staging_path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn committed_artifact_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = make_store();
        let entry = commit(&store, b"package main\n");
        let mode = std::fs::metadata(entry.artifact_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn hit_before_ttl_miss_after() {
        let (_dir, store) = make_store();
        let entry = commit(&store, b"package main\n");
        let built = artifact_mtime(&entry);
        let eps = Duration::from_secs(1);

        assert!(matches!(store.lookup_at(&entry, built + TTL - eps), Lookup::Hit(_)));
        assert_eq!(
            store.lookup_at(&entry, built + TTL + eps),
            Lookup::Miss(MissReason::Stale)
        );
    }

    #[test]
    fn uncommitted_entry_is_removed_and_misses() {
        let (_dir, store) = make_store();
        let fp = Fingerprint::from_bytes(b"package main\n");
        let entry = store.locate(fp);
        {
            let pending = store.prepare(&entry).unwrap();
            std::fs::write(pending.staging_path(), b"half").unwrap();
            assert!(entry.dir().exists());
        }
        assert!(!entry.dir().exists());
        assert_eq!(store.lookup(&entry), Lookup::Miss(MissReason::Absent));
    }

    #[test]
    fn failed_commit_rolls_back() {
        let (_dir, store) = make_store();
        let fp = Fingerprint::from_bytes(b"package main\n");
        let entry = store.locate(fp);
        let pending = store.prepare(&entry).unwrap();
        // No staged executable: commit fails after writing the source copy.
        let err = pending.commit(b"package main\n", &BuildMetadata::new("go1.22.3", fp));

        assert!(matches!(err, Err(CacheError::Io { .. })));
        assert!(!entry.dir().exists());
        assert_eq!(store.lookup(&entry), Lookup::Miss(MissReason::Absent));
    }

    #[test]
    fn artifact_without_metadata_misses() {
        let (_dir, store) = make_store();
        let entry = commit(&store, b"package main\n");
        std::fs::remove_file(entry.metadata_path()).unwrap();
        assert_eq!(store.lookup(&entry), Lookup::Miss(MissReason::Incomplete));
    }

    #[test]
    fn short_fingerprint_collision_misses() {
        let (_dir, store) = make_store();
        let entry = commit(&store, b"package main\n");
        let other = BuildMetadata::new("go1.22.3", Fingerprint::from_bytes(b"package other\n"));
        other.save(entry.metadata_path()).unwrap();
        assert_eq!(
            store.lookup(&entry),
            Lookup::Miss(MissReason::FingerprintMismatch)
        );
    }

    #[test]
    fn recommit_overwrites_entry() {
        let (_dir, store) = make_store();
        let entry = commit(&store, b"package main\n");
        let fp = *entry.fingerprint();
        let pending = store.prepare(&entry).unwrap();
        std::fs::write(pending.staging_path(), b"#!/bin/sh\nexit 3\n").unwrap();
        pending
            .commit(b"package main\n", &BuildMetadata::new("go1.23.0", fp))
            .unwrap();

        assert_eq!(
            std::fs::read(entry.artifact_path()).unwrap(),
            b"#!/bin/sh\nexit 3\n"
        );
        let meta = BuildMetadata::load(entry.metadata_path()).unwrap();
        assert_eq!(meta.toolchain_version, "go1.23.0");
    }

    #[test]
    fn rollback_leaves_other_entries() {
        let (_dir, store) = make_store();
        let keep = commit(&store, b"package keep\n");
        let gone = commit(&store, b"package gone\n");

        store.rollback(&gone).unwrap();

        assert!(!gone.dir().exists());
        assert!(matches!(store.lookup(&keep), Lookup::Hit(_)));
    }

    #[test]
    fn rollback_missing_entry_is_ok() {
        let (_dir, store) = make_store();
        let entry = store.locate(Fingerprint::from_bytes(b"never built"));
        assert!(store.rollback(&entry).is_ok());
    }

    #[test]
    fn clear_all_removes_everything() {
        let (_dir, store) = make_store();
        let a = commit(&store, b"package a\n");
        let b = commit(&store, b"package b\n");

        store.clear_all().unwrap();

        assert!(!store.root().exists());
        assert_eq!(store.lookup(&a), Lookup::Miss(MissReason::Absent));
        assert_eq!(store.lookup(&b), Lookup::Miss(MissReason::Absent));
    }

    #[test]
    fn clear_all_missing_root_is_ok() {
        let (_dir, store) = make_store();
        assert!(store.clear_all().is_ok());
        assert!(store.clear_all().is_ok());
    }

    fn set_age(path: &Path, age: Duration) {
        std::fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::now() - age)
            .unwrap();
    }

    #[test]
    fn prepare_sweeps_abandoned_staging_files() {
        let (_dir, store) = make_store();
        let entry = commit(&store, b"package main\n");
        let orphan = entry.dir().join(format!(".{ARTIFACT_NAME}.4000000001.partial"));
        std::fs::write(&orphan, b"half").unwrap();
        set_age(&orphan, Duration::from_secs(2 * 60 * 60));

        let pending = store.prepare(&entry).unwrap();

        assert!(!orphan.exists());
        assert!(entry.artifact_path().exists());
        assert!(entry.metadata_path().exists());
        drop(pending);
    }

    #[test]
    fn prepare_keeps_recent_staging_files() {
        let (_dir, store) = make_store();
        let entry = commit(&store, b"package main\n");
        let in_progress = entry.dir().join(format!(".{ARTIFACT_NAME}.4000000002.partial"));
        std::fs::write(&in_progress, b"half").unwrap();
        let unrelated = entry.dir().join("notes.partial");
        std::fs::write(&unrelated, b"keep").unwrap();
        set_age(&unrelated, Duration::from_secs(2 * 60 * 60));

        let pending = store.prepare(&entry).unwrap();

        assert!(in_progress.exists());
        assert!(unrelated.exists());
        drop(pending);
    }
}
