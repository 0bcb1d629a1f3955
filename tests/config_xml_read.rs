//! Verify XML config is parsed and used without touching user state.

use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use osm_export::config::{load_config, load_config_from_xml_path, LoadResult, CONFIG_ENV};
use osm_export::measure::arguments::{DESTINATION_DIR, USE_VERSIONING};
use osm_export::measure::ArgValue;
use osm_export::{DestinationMode, LogLevel};
use serial_test::serial;

#[test]
fn reads_config_xml_and_applies_values() {
    let td = tempdir().expect("create tempdir");
    let cfg_path = td.path().join("config.xml");
    let exports = td.path().join("exports");
    let log_file = td.path().join("osm_export.log");

    let xml = format!(
        r#"
<config>
  <custom_name>  office_tower  </custom_name>
  <destination>Custom Path</destination>
  <custom_path>{}</custom_path>
  <use_versioning> true </use_versioning>
  <version_suffix>_rev</version_suffix>
  <lock_destination>true</lock_destination>
  <log_level>debug</log_level>
  <log_file>{}</log_file>
</config>
"#,
        exports.display(),
        log_file.display()
    );
    fs::write(&cfg_path, xml).expect("write config.xml");

    let cfg = load_config_from_xml_path(&cfg_path).expect("load_config_from_xml_path");

    assert_eq!(cfg.custom_name.as_deref(), Some("office_tower"));
    assert_eq!(cfg.destination, DestinationMode::CustomPath);
    assert_eq!(cfg.custom_path, Some(exports));
    assert!(cfg.use_versioning);
    assert_eq!(cfg.version_suffix, "_rev");
    assert!(cfg.lock_destination);
    assert!(!cfg.create_destination);
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert_eq!(cfg.log_file, Some(log_file));

    let args = cfg.to_user_arguments();
    assert_eq!(args.get(DESTINATION_DIR), Some(&ArgValue::Str("Custom Path".into())));
    assert_eq!(args.get(USE_VERSIONING), Some(&ArgValue::Bool(true)));
}

#[test]
fn empty_elements_fall_back_to_defaults() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(
        &cfg_path,
        "<config><custom_name></custom_name><custom_path/><log_file>   </log_file></config>",
    )
    .unwrap();

    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    assert_eq!(cfg, osm_export::Config::default());
}

#[test]
fn malformed_xml_is_an_error() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><use_versioning>maybe</use_versioning></config>").unwrap();
    assert!(load_config_from_xml_path(&cfg_path).is_err());

    fs::write(&cfg_path, "<config><download_base>/x</download_base></config>").unwrap();
    assert!(load_config_from_xml_path(&cfg_path).is_err(), "unknown fields are rejected");
}

#[test]
#[serial]
fn env_override_is_loaded() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("alt.xml");
    fs::write(&cfg_path, "<config><version_suffix>_v</version_suffix></config>").unwrap();

    // SAFETY: serialized with every other test touching the environment.
    unsafe { std::env::set_var(CONFIG_ENV, &cfg_path) };
    let got = load_config();
    unsafe { std::env::remove_var(CONFIG_ENV) };

    match got.unwrap() {
        LoadResult::Loaded(path, cfg) => {
            assert_eq!(path, cfg_path);
            assert_eq!(cfg.version_suffix, "_v");
        }
        other => panic!("expected a loaded config, got {other:?}"),
    }
}

#[test]
#[serial]
fn env_pointing_at_missing_file_is_an_error() {
    let td = tempdir().unwrap();
    let missing: PathBuf = td.path().join("nope.xml");

    unsafe { std::env::set_var(CONFIG_ENV, &missing) };
    let got = load_config();
    unsafe { std::env::remove_var(CONFIG_ENV) };

    let err = got.unwrap_err();
    assert!(err.to_string().contains("does not exist"), "{err}");
}
