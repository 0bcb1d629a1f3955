//! Host collaborators.
//!
//! The workflow engine hands a measure two things: a view of the workflow (is a
//! model loaded, where is the root, where do generated files go) and a runner that
//! collects info/warning/error messages plus the final status. Both are traits so the
//! measure runs the same under the CLI and in tests.

mod runner;
mod workflow;

pub use runner::{Message, RecordingRunner, RunStatus, Severity};
pub use workflow::{Workflow, IN_OSM, REPORTS_DIR, RUN_DIR};

use std::path::{Path, PathBuf};

/// Read-only view of the running workflow.
pub trait WorkflowHost {
    /// Backing file of the last model the workflow produced, if any.
    fn last_model_path(&self) -> Option<PathBuf>;

    /// Absolute workflow root directory.
    fn absolute_root_dir(&self) -> &Path;

    /// Output-file search directories, in priority order.
    fn file_paths(&self) -> &[PathBuf];

    /// The simulated model file the export copies.
    fn run_model_path(&self) -> PathBuf {
        self.absolute_root_dir().join(RUN_DIR).join(IN_OSM)
    }
}

/// Severity-leveled message sinks and final status.
pub trait Runner {
    fn register_info(&mut self, msg: &str);
    fn register_warning(&mut self, msg: &str);
    fn register_error(&mut self, msg: &str);
    fn register_final_condition(&mut self, msg: &str);
    fn status(&self) -> RunStatus;
}
