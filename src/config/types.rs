//! Core configuration types.
//! - Config holds the export settings plus runtime switches.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::export::DestinationMode;
use crate::measure::arguments::{CUSTOM_NAME, CUSTOM_PATH, DESTINATION_DIR, USE_VERSIONING, VERSION_SUFFIX};
use crate::measure::{MeasureOptions, UserArguments};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration: export settings, then process switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Overrides the `<parent>_wMeasures` default name
    pub custom_name: Option<String>,
    pub destination: DestinationMode,
    /// Used when `destination` is CustomPath
    pub custom_path: Option<PathBuf>,
    pub use_versioning: bool,
    pub version_suffix: String,
    /// Generated-files directory; `<workflow root>/reports` when unset
    pub generated_dir: Option<PathBuf>,
    /// Lock the destination directory across version scan and copy
    pub lock_destination: bool,
    /// Create the destination directory if missing
    pub create_destination: bool,
    /// Plan only; do not copy
    pub dry_run: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Measure arguments equivalent to these settings.
    pub fn to_user_arguments(&self) -> UserArguments {
        let mut args = UserArguments::new();
        if let Some(name) = &self.custom_name {
            args.set_str(CUSTOM_NAME, name.clone());
        }
        args.set_str(DESTINATION_DIR, self.destination.label());
        if let Some(path) = &self.custom_path {
            args.set_str(CUSTOM_PATH, path.to_string_lossy());
        }
        args.set_bool(USE_VERSIONING, self.use_versioning);
        args.set_str(VERSION_SUFFIX, self.version_suffix.clone());
        args
    }

    pub fn measure_options(&self) -> MeasureOptions {
        MeasureOptions {
            lock_destination: self.lock_destination,
            create_destination: self.create_destination,
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::ArgValue;

    #[test]
    fn log_level_parse() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse(" verbose "), Some(LogLevel::Info));
        assert_eq!("loud".parse::<LogLevel>().unwrap_err(), "invalid log level: 'loud'");
    }

    #[test]
    fn user_arguments_from_config() {
        let cfg = Config {
            custom_name: Some("house".into()),
            destination: DestinationMode::CustomPath,
            custom_path: Some(PathBuf::from("/exports")),
            use_versioning: true,
            version_suffix: "_v".into(),
            ..Config::default()
        };
        let args = cfg.to_user_arguments();
        assert_eq!(args.get(CUSTOM_NAME), Some(&ArgValue::Str("house".into())));
        assert_eq!(args.get(DESTINATION_DIR), Some(&ArgValue::Str("Custom Path".into())));
        assert_eq!(args.get(CUSTOM_PATH), Some(&ArgValue::Str("/exports".into())));
        assert_eq!(args.get(USE_VERSIONING), Some(&ArgValue::Bool(true)));
        assert_eq!(args.get(VERSION_SUFFIX), Some(&ArgValue::Str("_v".into())));
    }
}
