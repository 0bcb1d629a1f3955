//! Default path helpers and symlink checks.

use anyhow::{anyhow, Result};
use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file (or a directory holding config.xml).
pub const CONFIG_ENV: &str = "OSM_EXPORT_CONFIG";

const APP_DIR: &str = "osm_export";
const CONFIG_FILE: &str = "config.xml";

/// Config path: `$OSM_EXPORT_CONFIG` if set (relative paths against the current
/// directory, directories get `config.xml` appended), else the OS config dir.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(raw) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        let mut p = PathBuf::from(raw);
        if p.is_relative() {
            p = env::current_dir()?.join(p);
        }
        if p.is_dir() {
            p.push(CONFIG_FILE);
        }
        return Ok(p);
    }
    let mut base = config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .ok_or_else(|| anyhow!("cannot determine a config directory (no HOME)"))?;
    base.push(APP_DIR);
    base.push(CONFIG_FILE);
    Ok(base)
}

/// Suggested log file location (data dir). Not created.
pub fn default_log_path() -> Result<PathBuf> {
    let mut base = data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
        .ok_or_else(|| anyhow!("cannot determine a data directory (no HOME)"))?;
    base.push(APP_DIR);
    base.push("osm_export.log");
    Ok(base)
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() && fs::symlink_metadata(anc)?.file_type().is_symlink() {
            return Ok(true);
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn env_directory_gets_config_file_appended() {
        let td = tempfile::tempdir().unwrap();
        // SAFETY: serialized with every other test touching the environment.
        unsafe { env::set_var(CONFIG_ENV, td.path()) };
        let got = default_config_path().unwrap();
        unsafe { env::remove_var(CONFIG_ENV) };
        assert_eq!(got, td.path().join("config.xml"));
    }

    #[test]
    #[serial]
    fn env_file_used_verbatim() {
        let td = tempfile::tempdir().unwrap();
        let file = td.path().join("custom.xml");
        unsafe { env::set_var(CONFIG_ENV, &file) };
        let got = default_config_path().unwrap();
        unsafe { env::remove_var(CONFIG_ENV) };
        assert_eq!(got, file);
    }

    #[cfg(unix)]
    #[test]
    fn detects_symlinked_ancestor() {
        let td = tempfile::tempdir().unwrap();
        let root = dunce::canonicalize(td.path()).unwrap();
        let real = root.join("real");
        fs::create_dir_all(&real).unwrap();
        let link = root.join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        assert!(path_has_symlink_ancestor(&link.join("x.log")).unwrap());
        assert!(!path_has_symlink_ancestor(&real.join("x.log")).unwrap());
    }
}
