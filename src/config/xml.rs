//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request.
//!
//! Notes:
//! - Unknown XML fields are a hard error so typos surface instead of being ignored.
//! - Blank elements mean "unset".

use anyhow::{bail, Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, path_has_symlink_ancestor, CONFIG_ENV};
use super::types::{Config, LogLevel};
use crate::export::DestinationMode;
use crate::platform::write_new_file_secure;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(default)]
    custom_name: Option<String>,
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    custom_path: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    use_versioning: Option<bool>,
    /// Kept verbatim (not trimmed); a suffix is literal text.
    #[serde(default)]
    version_suffix: Option<String>,
    #[serde(default)]
    generated_dir: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    lock_destination: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    create_destination: Option<bool>,
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    log_file: Option<String>,
}

// Booleans may carry surrounding whitespace or be blank.
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!("invalid boolean '{other}'"))),
        },
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config {
        custom_name: non_blank(parsed.custom_name),
        custom_path: non_blank(parsed.custom_path).map(PathBuf::from),
        use_versioning: parsed.use_versioning.unwrap_or(false),
        version_suffix: parsed.version_suffix.unwrap_or_default(),
        generated_dir: non_blank(parsed.generated_dir).map(PathBuf::from),
        lock_destination: parsed.lock_destination.unwrap_or(false),
        create_destination: parsed.create_destination.unwrap_or(false),
        log_file: non_blank(parsed.log_file).map(PathBuf::from),
        ..Config::default()
    };
    if let Some(d) = non_blank(parsed.destination) {
        cfg.destination = DestinationMode::parse(&d)
            .with_context(|| format!("invalid <destination> '{d}'"))?;
    }
    if let Some(l) = non_blank(parsed.log_level) {
        cfg.log_level = LogLevel::parse(&l).with_context(|| format!("invalid <log_level> '{l}'"))?;
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("config xml '{}'", path.display()))
}

/// Outcome of looking for a config file.
#[derive(Debug)]
pub enum LoadResult {
    Loaded(PathBuf, Config),
    /// No file at the default location; built-in defaults apply.
    Missing(PathBuf),
}

/// Load the config from `$OSM_EXPORT_CONFIG` or the default location.
/// An explicitly configured file that doesn't exist is an error.
pub fn load_config() -> Result<LoadResult> {
    let path = default_config_path()?;
    if !path.exists() {
        if std::env::var_os(CONFIG_ENV).is_some_and(|v| !v.is_empty()) {
            bail!("{CONFIG_ENV} points to '{}', which does not exist", path.display());
        }
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(LoadResult::Missing(path));
    }
    let cfg = load_config_from_xml_path(&path)?;
    debug!(path = %path.display(), "loaded config");
    Ok(LoadResult::Loaded(path, cfg))
}

pub const TEMPLATE: &str = r#"<!--
  osm_export configuration (XML)

  custom_name         -> export name without extension (blank: <parent model>_wMeasures)
  destination         -> "Generated Files Directory" or "Custom Path"
  custom_path         -> destination directory when destination is "Custom Path"
  use_versioning      -> true/false; append an incrementing version number
  version_suffix      -> literal text before the version number, e.g. _v
  generated_dir       -> generated files directory (blank: <workflow root>/reports)
  lock_destination    -> true/false; serialize concurrent exports into one directory
  create_destination  -> true/false; create the destination directory if missing
  log_level           -> quiet | normal | info | debug
  log_file            -> optional log file path

  CLI flags override these values.
-->
<config>
  <custom_name></custom_name>
  <destination>Generated Files Directory</destination>
  <custom_path></custom_path>
  <use_versioning>false</use_versioning>
  <version_suffix>_v</version_suffix>
  <generated_dir></generated_dir>
  <lock_destination>false</lock_destination>
  <create_destination>false</create_destination>
  <log_level>normal</log_level>
  <log_file></log_file>
</config>
"#;

/// Write the commented template to `path`. Refuses to overwrite or to write
/// beneath a symlinked directory.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!("Refusing to create config: ancestor of {} is a symlink", path.display());
    }
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
    }
    write_new_file_secure(path, TEMPLATE.as_bytes())
        .with_context(|| format!("write template config '{}'", path.display()))?;
    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_to_expected_values() {
        let parsed: XmlConfig = from_xml_str(TEMPLATE).unwrap();
        let cfg = xml_to_config(parsed).unwrap();
        assert_eq!(cfg.destination, DestinationMode::GeneratedDirectory);
        assert_eq!(cfg.version_suffix, "_v");
        assert!(!cfg.use_versioning);
        assert_eq!(cfg.custom_name, None);
        assert_eq!(cfg.custom_path, None);
        assert_eq!(cfg.log_level, LogLevel::Normal);
    }

    #[test]
    fn unknown_field_rejected() {
        let err = from_xml_str::<XmlConfig>("<config><colour>red</colour></config>").unwrap_err();
        assert!(err.to_string().contains("unknown field"), "{err}");
    }

    #[test]
    fn trimmed_booleans_and_bad_destination() {
        let parsed: XmlConfig =
            from_xml_str("<config><use_versioning>  true </use_versioning></config>").unwrap();
        assert_eq!(parsed.use_versioning, Some(true));

        let parsed: XmlConfig = from_xml_str("<config><destination>Reports Directory</destination></config>").unwrap();
        assert!(xml_to_config(parsed).is_err());
    }

    #[test]
    fn template_written_once() {
        let td = tempfile::tempdir().unwrap();
        let root = dunce::canonicalize(td.path()).unwrap();
        let path = root.join("nested").join("config.xml");
        create_template_config(&path).unwrap();
        assert!(load_config_from_xml_path(&path).is_ok());
        assert!(create_template_config(&path).is_err());
    }
}
