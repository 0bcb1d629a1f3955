//! Copy with overwrite:
//! - Copies the source to a hidden temp file inside the destination directory
//! - Fsyncs the temp file
//! - Atomically renames temp -> dest, replacing any file already at dest
//!
//! Readers of the destination directory never observe a half-written `.osm`.

use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing::{debug, warn};

use super::atomic::atomic_replace;
use super::helpers::io_error_with_help;
use super::util;
use crate::errors::ExportError;

/// Copy `src` to `dest`, overwriting `dest` if it exists. Returns the bytes copied.
///
/// The destination directory must already exist; `src` is only read.
pub fn copy_overwrite(src: &Path, dest: &Path) -> Result<u64, ExportError> {
    let dest_dir = dest.parent().ok_or_else(|| {
        ExportError::Configuration(format!("Destination has no parent directory: {}", dest.display()))
    })?;

    let tmp = util::unique_temp_path(dest_dir);
    let bytes = match fs::copy(src, &tmp) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            return Err(io_error_with_help("copy the model to", dest)(e));
        }
    };

    let synced = OpenOptions::new()
        .write(true)
        .open(&tmp)
        .and_then(|f| f.sync_all());
    if let Err(e) = synced {
        let _ = fs::remove_file(&tmp);
        return Err(io_error_with_help("flush temporary copy", &tmp)(e));
    }

    if dest.exists() {
        debug!(dest = %dest.display(), "destination exists and will be overwritten");
    }

    if let Err(e) = atomic_replace(&tmp, dest) {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            warn!(tmp = %tmp.display(), error = %cleanup, "failed to remove temporary copy");
        }
        return Err(io_error_with_help("move the copied model into", dest)(e));
    }

    debug!(src = %src.display(), dest = %dest.display(), bytes, "copied");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn copies_and_leaves_source_untouched() {
        let dir = assert_fs::TempDir::new().unwrap();
        let src = dir.child("in.osm");
        src.write_str("OS:Version").unwrap();
        let dest = dir.child("out").child("house.osm");
        dir.child("out").create_dir_all().unwrap();

        let n = copy_overwrite(src.path(), dest.path()).unwrap();
        assert_eq!(n, 10);
        dest.assert("OS:Version");
        src.assert("OS:Version");
    }

    #[test]
    fn overwrites_existing_destination() {
        let dir = assert_fs::TempDir::new().unwrap();
        let src = dir.child("in.osm");
        src.write_str("new").unwrap();
        let dest = dir.child("house.osm");
        dest.write_str("old contents").unwrap();

        copy_overwrite(src.path(), dest.path()).unwrap();
        dest.assert("new");
    }

    #[test]
    fn missing_destination_dir_is_io_error_and_leaves_nothing() {
        let dir = assert_fs::TempDir::new().unwrap();
        let src = dir.child("in.osm");
        src.write_str("x").unwrap();
        let dest = dir.child("missing").child("house.osm");

        let err = copy_overwrite(src.path(), dest.path()).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }), "{err:?}");
        assert!(!dir.child("missing").path().exists());
    }
}
