//! File naming: base-name selection and final `.osm` name construction.

use std::path::Path;

use crate::errors::ExportError;

/// Extension of every exported model (without the dot).
pub const MODEL_EXTENSION: &str = "osm";

/// Appended to the parent model's stem to form the default export name.
pub const DEFAULT_NAME_SUFFIX: &str = "_wMeasures";

/// Default base name derived from the parent model's file name,
/// e.g. `office.osm` -> `office_wMeasures`.
pub fn derived_default_name(parent_model: &Path) -> String {
    let stem = parent_model
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}{DEFAULT_NAME_SUFFIX}")
}

/// Pick the base name: a non-blank custom name (extension and directories stripped)
/// wins over the derived default.
pub fn select_base_name(custom_name: Option<&str>, derived_default: &str) -> String {
    match custom_name.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => Path::new(name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string()),
        None => derived_default.to_string(),
    }
}

fn has_separator(s: &str) -> bool {
    s.contains('/') || s.contains('\\')
}

/// Reject names that would escape the destination directory or produce a bare `.osm`.
pub fn validate_base_name(base: &str) -> Result<(), ExportError> {
    if base.is_empty() || base == "." || base == ".." || has_separator(base) {
        return Err(ExportError::Configuration(format!(
            "Invalid export file name '{base}': must be a plain file name"
        )));
    }
    Ok(())
}

pub fn validate_version_suffix(suffix: &str) -> Result<(), ExportError> {
    if has_separator(suffix) {
        return Err(ExportError::Configuration(format!(
            "Invalid version suffix '{suffix}': path separators are not allowed"
        )));
    }
    Ok(())
}

/// `<base>.osm`
pub fn plain_file_name(base: &str) -> String {
    format!("{base}.{MODEL_EXTENSION}")
}

/// `<base><suffix><version>.osm`
pub fn versioned_file_name(base: &str, suffix: &str, version: u64) -> String {
    format!("{base}{suffix}{version}.{MODEL_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_name_extension_is_stripped() {
        assert_eq!(select_base_name(Some("foo.osm"), "parent_wMeasures"), "foo");
        assert_eq!(select_base_name(Some("foo"), "parent_wMeasures"), "foo");
        assert_eq!(select_base_name(Some("a.b.osm"), "x"), "a.b");
    }

    #[test]
    fn blank_custom_name_falls_back_to_default() {
        assert_eq!(select_base_name(None, "parent_wMeasures"), "parent_wMeasures");
        assert_eq!(select_base_name(Some(""), "parent_wMeasures"), "parent_wMeasures");
        assert_eq!(select_base_name(Some("   "), "parent_wMeasures"), "parent_wMeasures");
    }

    #[test]
    fn custom_name_directories_are_dropped() {
        assert_eq!(select_base_name(Some("sub/dir/foo.osm"), "x"), "foo");
    }

    #[test]
    fn default_name_from_parent_model() {
        assert_eq!(derived_default_name(Path::new("/w/office.osm")), "office_wMeasures");
    }

    #[test]
    fn invalid_names_rejected() {
        assert!(validate_base_name("").is_err());
        assert!(validate_base_name("..").is_err());
        assert!(validate_base_name("a/b").is_err());
        assert!(validate_base_name("house").is_ok());
        assert!(validate_version_suffix("_v").is_ok());
        assert!(validate_version_suffix("/v").is_err());
    }

    #[test]
    fn file_names() {
        assert_eq!(plain_file_name("house"), "house.osm");
        assert_eq!(versioned_file_name("house", "_v", 4), "house_v4.osm");
        assert_eq!(versioned_file_name("house", "", 1), "house1.osm");
    }
}
