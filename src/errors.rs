//! Typed error definitions for osm_export.
//! Every export failure maps to exactly one variant so callers can report it once.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// A required option is missing or contradicts another one.
    #[error("{0}")]
    Configuration(String),

    #[error("The source file '{}' does not exist.", .0.display())]
    SourceNotFound(PathBuf),

    /// Copy, scan or lock failure; `message` carries the enriched OS error.
    #[error("Failed to {op} '{}': {message}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("No model loaded.")]
    NoModelLoaded,

    #[error("No parent model file found in the expected directory: {}", .0.display())]
    ParentModelNotFound(PathBuf),

    #[error("{0}")]
    InvalidArgument(String),
}

impl ExportError {
    /// Stable numeric code for structured logs and exit diagnostics.
    pub fn code(&self) -> u16 {
        match self {
            ExportError::Configuration(_) => 10,
            ExportError::SourceNotFound(_) => 11,
            ExportError::Io { .. } => 12,
            ExportError::Interrupted => 13,
            ExportError::NoModelLoaded => 20,
            ExportError::ParentModelNotFound(_) => 21,
            ExportError::InvalidArgument(_) => 22,
        }
    }

    /// Short machine-friendly kind, used as the `kind` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ExportError::Configuration(_) => "configuration",
            ExportError::SourceNotFound(_) => "source_not_found",
            ExportError::Io { .. } => "io",
            ExportError::Interrupted => "interrupted",
            ExportError::NoModelLoaded => "no_model_loaded",
            ExportError::ParentModelNotFound(_) => "parent_model_not_found",
            ExportError::InvalidArgument(_) => "invalid_argument",
        }
    }
}
