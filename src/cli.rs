//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --workflow-root takes precedence over the positional WORKFLOW_ROOT.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::export::DestinationMode;

/// Export the simulated model of a workflow run to a named, optionally versioned .osm file.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Export the model with measure changes from an OpenStudio workflow run"
)]
pub struct Args {
    /// Workflow root directory (holds run/in.osm). Defaults to the current directory.
    #[arg(value_name = "WORKFLOW_ROOT", value_hint = ValueHint::DirPath)]
    pub workflow_root_pos: Option<PathBuf>,

    #[arg(
        long = "workflow-root",
        short = 'w',
        value_name = "DIR",
        value_hint = ValueHint::DirPath,
        help = "Workflow root directory (overrides positional)"
    )]
    pub workflow_root: Option<PathBuf>,

    /// Export name without the .osm extension.
    #[arg(long, short = 'n', value_name = "NAME", help = "Custom export name (default: <parent model>_wMeasures)")]
    pub custom_name: Option<String>,

    #[arg(
        long,
        value_name = "MODE",
        help = "Destination: generated | custom (or \"Generated Files Directory\" / \"Custom Path\")"
    )]
    pub destination: Option<DestinationMode>,

    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath, help = "Destination directory for --destination custom")]
    pub custom_path: Option<PathBuf>,

    #[arg(long, help = "Append an incrementing version number to the export name")]
    pub versioning: bool,

    #[arg(long, value_name = "SUFFIX", allow_hyphen_values = true, help = "Text placed before the version number, e.g. _v")]
    pub version_suffix: Option<String>,

    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath, help = "Generated files directory (default: <root>/reports)")]
    pub generated_dir: Option<PathBuf>,

    /// Strict mode: serialize concurrent exports into one directory.
    #[arg(long, help = "Lock the destination directory from version scan to copy")]
    pub lock: bool,

    #[arg(long, help = "Create the destination directory if it does not exist")]
    pub create_dirs: bool,

    /// Dry-run: report the destination but do not copy.
    #[arg(long, help = "Show where the model would be exported, but do not write it")]
    pub dry_run: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    #[arg(long, help = "Print the config file location used by osm_export and exit")]
    pub print_config: bool,

    #[arg(long, help = "Write a template config file at the config location and exit")]
    pub init_config: bool,
}

impl Args {
    /// Workflow root: `--workflow-root`, else positional, else the current directory.
    pub fn resolved_root(&self) -> PathBuf {
        self.workflow_root
            .clone()
            .or_else(|| self.workflow_root_pos.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(name) = &self.custom_name {
            cfg.custom_name = Some(name.clone());
        }
        if let Some(mode) = self.destination {
            cfg.destination = mode;
        }
        if let Some(p) = &self.custom_path {
            cfg.custom_path = Some(p.clone());
        }
        if self.versioning {
            cfg.use_versioning = true;
        }
        if let Some(s) = &self.version_suffix {
            cfg.version_suffix = s.clone();
        }
        if let Some(d) = &self.generated_dir {
            cfg.generated_dir = Some(d.clone());
        }
        if self.lock {
            cfg.lock_destination = true;
        }
        if self.create_dirs {
            cfg.create_destination = true;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
