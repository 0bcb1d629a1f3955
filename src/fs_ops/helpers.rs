//! I/O error enrichment.
//!
//! Converts `io::Error` into `ExportError::Io` with the operation, the path and a
//! platform-aware hint, so the single reported message is actionable.
//!
//! Usage:
//!   fs::read_dir(dir).map_err(io_error_with_help("scan destination directory", dir))?;

use std::io;
use std::path::Path;

use crate::errors::ExportError;

/// Hint for well-known OS error codes, falling back to the error kind.
fn hint_for(e: &io::Error) -> Option<&'static str> {
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            let hint = match code {
                libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
                libc::ENOENT => Some("path not found; verify the destination directory exists"),
                libc::ENOTDIR => Some("a path component is not a directory"),
                libc::EISDIR => Some("destination is a directory"),
                libc::ENOSPC => Some("insufficient space on device"),
                libc::EROFS => Some("read-only filesystem; cannot write here"),
                libc::ENAMETOOLONG => Some("filename or path too long; shorten the custom name or path"),
                libc::EXDEV => Some("cross-filesystem rename not possible"),
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
        #[cfg(windows)]
        {
            let hint = match code {
                5 => Some("access denied; check permissions"),
                2 | 3 => Some("path not found; verify the destination directory exists"),
                32 => Some("sharing violation; the file is in use"),
                112 => Some("insufficient disk space"),
                206 => Some("filename or path too long"),
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
    }
    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        _ => None,
    }
}

/// Render the underlying error with its hint and raw OS code.
pub(crate) fn describe_io_error(e: &io::Error) -> String {
    let mut msg = e.to_string();
    if let Some(hint) = hint_for(e) {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {code}]"));
    }
    msg
}

/// Returns a closure suitable for `.map_err(...)` that converts io::Error -> ExportError::Io.
pub(crate) fn io_error_with_help<'a>(
    op: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> ExportError + 'a {
    move |e: io::Error| ExportError::Io {
        op,
        path: path.to_path_buf(),
        message: describe_io_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_gets_hint() {
        let e = io::Error::from(io::ErrorKind::NotFound);
        let msg = describe_io_error(&e);
        assert!(msg.contains("path not found"), "{msg}");
    }

    #[cfg(unix)]
    #[test]
    fn raw_code_is_reported() {
        let e = io::Error::from_raw_os_error(libc::ENOSPC);
        let err = io_error_with_help("copy model", Path::new("/x/y.osm"))(e);
        let s = err.to_string();
        assert!(s.contains("insufficient space"), "{s}");
        assert!(s.contains(&format!("[os code: {}]", libc::ENOSPC)), "{s}");
        assert!(s.contains("/x/y.osm"));
    }
}
