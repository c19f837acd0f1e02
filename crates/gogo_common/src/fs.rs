//! Filesystem helpers shared by the cache and build stages.

use std::io;
use std::path::Path;

/// Marks a file as executable by its owner, group and others (`0o755`).
///
/// A no-op on platforms that do not use permission bits for executability.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)
}

/// Marks a file as executable by its owner, group and others (`0o755`).
///
/// A no-op on platforms that do not use permission bits for executability.
#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
