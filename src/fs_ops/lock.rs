//! Advisory destination-directory lock (strict export mode).
//!
//! Design:
//! - We lock by holding an exclusive `fs2` lock on `.osm_export.dir.lock` inside the
//!   destination directory, from before the version scan until after the copy.
//! - The lock file is removed when the guard drops. A waiter that wakes up holding a
//!   lock on an unlinked file re-opens and locks again, so two exporters can never both
//!   believe they own the directory.
//! - This module returns io::Result to keep low-level errors precise.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::trace;

use super::util::TRANSIENT_PREFIX;

/// RAII guard held while the directory lock is active.
#[derive(Debug)]
pub struct DirLock {
    file: Option<File>,
    path: PathBuf,
}

impl DirLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DirLock {
    // Unix: unlink before unlocking so a waiter always notices the stale inode.
    #[cfg(unix)]
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        if let Some(file) = self.file.take() {
            let _ = FileExt::unlock(&file);
        }
    }

    // Windows can't delete a file with open handles; close ours first.
    #[cfg(not(unix))]
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = FileExt::unlock(&file);
        }
        let _ = fs::remove_file(&self.path);
    }
}

pub fn lock_file_path(dir: &Path) -> PathBuf {
    dir.join(format!("{TRANSIENT_PREFIX}dir.lock"))
}

fn open_lock_file(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
}

/// True if `path` still names the file we hold open.
#[cfg(unix)]
fn still_linked(file: &File, path: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;
    let held = file.metadata()?;
    match fs::metadata(path) {
        Ok(on_disk) => Ok(held.dev() == on_disk.dev() && held.ino() == on_disk.ino()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

// Windows refuses to delete a file with open handles, so the lock file can't be swapped under us.
#[cfg(not(unix))]
fn still_linked(_file: &File, path: &Path) -> io::Result<bool> {
    Ok(path.exists())
}

/// Blocking acquire of the directory lock.
pub fn acquire_dir_lock(dir: &Path) -> io::Result<DirLock> {
    let path = lock_file_path(dir);
    let start = Instant::now();
    loop {
        let file = open_lock_file(&path)?;
        FileExt::lock_exclusive(&file)?;
        if still_linked(&file, &path)? {
            trace!(path = %path.display(), waited_ms = start.elapsed().as_millis() as u64, "lock acquired");
            return Ok(DirLock { file: Some(file), path });
        }
        trace!(path = %path.display(), "lock file replaced while waiting; retrying");
    }
}

/// Non-blocking attempt. Ok(None) if another exporter holds the lock.
pub fn try_acquire_dir_lock(dir: &Path) -> io::Result<Option<DirLock>> {
    let path = lock_file_path(dir);
    let file = open_lock_file(&path)?;
    match FileExt::try_lock_exclusive(&file) {
        Ok(()) => {
            if still_linked(&file, &path)? {
                Ok(Some(DirLock { file: Some(file), path }))
            } else {
                Ok(None)
            }
        }
        Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
            trace!(path = %path.display(), "try-lock would block");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncontended_then_released() {
        let td = tempfile::tempdir().unwrap();
        let lock = try_acquire_dir_lock(td.path()).unwrap().expect("uncontended");
        assert!(lock.path().exists());
        drop(lock);
        assert!(!lock_file_path(td.path()).exists(), "lock file removed on drop");
    }

    #[test]
    fn contended_returns_none() {
        let td = tempfile::tempdir().unwrap();
        let first = acquire_dir_lock(td.path()).unwrap();
        assert!(try_acquire_dir_lock(td.path()).unwrap().is_none());
        drop(first);
        assert!(try_acquire_dir_lock(td.path()).unwrap().is_some());
    }
}
