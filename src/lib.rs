//! Core library for `osm_export`.
//!
//! Exports the simulated OpenStudio model (`<workflow root>/run/in.osm`) under a
//! chosen name into the generated files directory or a custom path, optionally
//! appending the next free version number.
//!
//! Layers:
//! - `export`: pure naming/versioning plus the copy step
//! - `measure`: the reporting measure wrapping `export` for a workflow host
//! - `config`/`cli`: settings from XML and command-line flags

pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod fs_ops;
pub mod host;
pub mod measure;
pub mod output;
pub mod platform;
pub mod shutdown;

pub use config::{default_config_path, default_log_path, path_has_symlink_ancestor, Config, LogLevel};
pub use errors::ExportError;
pub use export::{plan, prepare, resolve, DestinationMode, ExportOutcome, ExportPlan, ExportRequest, Exported};
pub use host::{RecordingRunner, Runner, Workflow, WorkflowHost};
pub use measure::{ExportModelMeasure, MeasureOptions, UserArguments};
