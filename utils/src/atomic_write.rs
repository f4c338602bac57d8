//! Atomic file write helpers.
//!
//! Writes go to a temp file in the destination directory and are renamed over
//! the target, so readers see either the old bytes or the new bytes. Where
//! rename-over-existing fails (Windows), the old file is moved to `.bak` first
//! and restored if the second rename also fails.

use std::fs;
#[cfg(unix)]
use std::fs::{File, Permissions};
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// Inherit the process umask.
    #[default]
    Inherit,
    /// Owner read/write only (0o600 on Unix, ignored elsewhere).
    OwnerOnly,
}

impl FileMode {
    #[cfg(unix)]
    fn unix_mode(self) -> Option<u32> {
        match self {
            Self::Inherit => None,
            Self::OwnerOnly => Some(0o600),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// `sync_all` the temp file, then best-effort sync of the parent directory.
    Durable,
    /// Rename only. Tests use this to keep the suite fast.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub sync: SyncPolicy,
    pub mode: FileMode,
    /// Create missing parent directories before writing.
    pub create_parent: bool,
}

impl WriteOptions {
    /// Saved wizard answers: durable and private to the user.
    #[must_use]
    pub const fn document() -> Self {
        Self {
            sync: SyncPolicy::Durable,
            mode: FileMode::OwnerOnly,
            create_parent: true,
        }
    }

    /// Exported snapshots are meant to be shared, so they keep the umask.
    #[must_use]
    pub const fn export() -> Self {
        Self {
            sync: SyncPolicy::Durable,
            mode: FileMode::Inherit,
            create_parent: true,
        }
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::document()
    }
}

fn parent_of(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Restore `path` from `path.bak` left behind by an interrupted write.
///
/// Returns `true` when a backup was moved back into place.
pub fn restore_backup(path: &Path) -> bool {
    let backup = path.with_extension("bak");
    if path.exists() || !backup.exists() {
        return false;
    }
    match fs::rename(&backup, path) {
        Ok(()) => {
            tracing::warn!(
                path = %path.display(),
                "Recovered .bak file from interrupted atomic write"
            );
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to recover .bak file: {e}");
            false
        }
    }
}

pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8], options: WriteOptions) -> io::Result<()> {
    let path = path.as_ref();
    let parent = parent_of(path);
    if options.create_parent {
        fs::create_dir_all(parent)?;
    }

    let mut tmp = NamedTempFile::new_in(parent)?;
    #[cfg(unix)]
    if let Some(mode) = options.mode.unix_mode() {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), Permissions::from_mode(mode))?;
    }

    tmp.write_all(bytes)?;
    if options.sync == SyncPolicy::Durable {
        tmp.as_file().sync_all()?;
    }

    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        let backup = path.with_extension("bak");
        let _ = fs::remove_file(&backup);
        fs::rename(path, &backup)?;

        if let Err(retry) = err.file.persist(path) {
            let _ = fs::rename(&backup, path);
            return Err(retry.error);
        }
        if let Err(e) = fs::remove_file(&backup) {
            tracing::warn!(
                path = %backup.display(),
                "Failed to remove .bak after atomic write: {e}"
            );
        }
    }

    if options.sync == SyncPolicy::Durable {
        sync_dir(parent);
    }
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        debug!(path = %dir.display(), "Parent directory sync_all failed (best-effort): {e}");
    }
}

#[cfg(not(unix))]
fn sync_dir(dir: &Path) {
    debug!(path = %dir.display(), "Skipping parent directory sync on this platform");
}
