use std::path::{Path, PathBuf};

use super::WorkflowHost;

/// Run directory under the workflow root.
pub const RUN_DIR: &str = "run";
/// Model file written by the simulation run.
pub const IN_OSM: &str = "in.osm";
/// Default generated-files directory under the workflow root.
pub const REPORTS_DIR: &str = "reports";

/// Filesystem-backed workflow: a root directory laid out the way the engine leaves it.
#[derive(Debug, Clone)]
pub struct Workflow {
    root: PathBuf,
    file_paths: Vec<PathBuf>,
}

impl Workflow {
    /// Workflow rooted at `root`, generated files going to `<root>/reports`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let reports = root.join(REPORTS_DIR);
        Self {
            root,
            file_paths: vec![reports],
        }
    }

    /// Replace the primary output directory.
    pub fn with_generated_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        match self.file_paths.first_mut() {
            Some(first) => *first = dir,
            None => self.file_paths.push(dir),
        }
        self
    }
}

impl WorkflowHost for Workflow {
    /// The run's `in.osm` is the last model once the simulation produced it.
    fn last_model_path(&self) -> Option<PathBuf> {
        let p = self.run_model_path();
        p.is_file().then_some(p)
    }

    fn absolute_root_dir(&self) -> &Path {
        &self.root
    }

    fn file_paths(&self) -> &[PathBuf] {
        &self.file_paths
    }
}
