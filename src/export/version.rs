//! Version-number scanning.
//!
//! Existing exports are recognised by the exact pattern
//! `^<base><suffix>([0-9]+)\.osm$`, with both user values escaped so regex
//! metacharacters in a model name match literally. The next version is one past
//! the highest number found, or 1.

use regex::Regex;
use std::io;
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::naming::MODEL_EXTENSION;
use crate::errors::ExportError;
use crate::fs_ops::io_error_with_help;

/// Result of scanning a destination directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionScan {
    /// Number of entries matching the version pattern.
    pub matches: usize,
    /// Highest version number found, if any.
    pub highest: Option<u64>,
}

impl VersionScan {
    pub fn next_version(&self) -> u64 {
        self.highest.map_or(1, |h| h.saturating_add(1).max(1))
    }
}

/// Build the matcher for `<base><suffix><digits>.osm`.
pub fn version_pattern(base: &str, suffix: &str) -> Result<Regex, ExportError> {
    let pattern = format!(
        r"^{}{}([0-9]+)\.{}$",
        regex::escape(base),
        regex::escape(suffix),
        MODEL_EXTENSION
    );
    Regex::new(&pattern)
        .map_err(|e| ExportError::Configuration(format!("Cannot build version pattern: {e}")))
}

/// Fold file names into a scan. Names that don't match, or whose digit run
/// overflows u64, are ignored.
pub fn scan_names<'a, I>(pattern: &Regex, names: I) -> VersionScan
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scan = VersionScan { matches: 0, highest: None };
    for name in names {
        let Some(caps) = pattern.captures(name) else {
            continue;
        };
        scan.matches += 1;
        match caps[1].parse::<u64>() {
            Ok(n) => {
                trace!(name, version = n, "found previous version");
                scan.highest = Some(scan.highest.map_or(n, |h| h.max(n)));
            }
            Err(_) => debug!(name, "version number out of range; ignored"),
        }
    }
    scan
}

/// List `dir` once (depth 1) and scan the entry names. A missing directory has no versions.
pub fn scan_directory(dir: &Path, base: &str, suffix: &str) -> Result<VersionScan, ExportError> {
    let pattern = version_pattern(base, suffix)?;

    if !dir.exists() {
        debug!(dir = %dir.display(), "destination directory does not exist; no previous versions");
        return Ok(VersionScan { matches: 0, highest: None });
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let err = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("directory loop while scanning"));
            io_error_with_help("scan destination directory", dir)(err)
        })?;
        // Non-UTF-8 names can't match a UTF-8 base name.
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_owned());
        }
    }

    Ok(scan_names(&pattern, names.iter().map(String::as_str)))
}
