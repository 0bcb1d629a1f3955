//! Atomic replace.
//! - On Windows, removes an existing destination first (rename doesn't overwrite there).
//! - On Unix, best-effort fsync of the destination directory after the rename.

use std::fs;
use std::io;
use std::path::Path;

pub(super) fn atomic_replace(src: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        if dst.is_file() {
            if let Err(e) = fs::remove_file(dst) {
                if e.kind() != io::ErrorKind::NotFound {
                    return Err(e);
                }
            }
        }
    }

    fs::rename(src, dst)?;

    // A failed directory fsync must not turn a completed rename into a failure.
    if let Some(parent) = dst.parent() {
        let _ = super::util::fsync_dir(parent);
    }
    Ok(())
}
