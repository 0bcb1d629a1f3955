//! Versioned model export.
//!
//! Resolution runs in a fixed order, failing at the first problem:
//! 1. base name (custom name with extension stripped, else the derived default)
//! 2. destination directory (generated dir, or the normalized custom path)
//! 3. optional version scan of the destination (`<base><suffix><n>.osm`, n = max + 1)
//! 4. source existence check
//! 5. copy, overwriting a file with exactly the final name
//!
//! Concurrency: by default two exporters racing on one directory may pick the same
//! version and the last copy wins. With `lock_destination` the destination directory
//! lock is held from before the scan until the copy completes.

mod destination;
mod naming;
mod version;

pub use destination::{absolutize, select_destination, DestinationMode};
pub use naming::{
    derived_default_name, plain_file_name, select_base_name, versioned_file_name,
    DEFAULT_NAME_SUFFIX, MODEL_EXTENSION,
};
pub use version::{scan_directory, scan_names, version_pattern, VersionScan};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::ExportError;
use crate::fs_ops::{acquire_dir_lock, copy_overwrite, io_error_with_help, DirLock};
use crate::shutdown;

/// Immutable input bundle for one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub source_path: PathBuf,
    pub custom_name: Option<String>,
    pub derived_default_name: String,
    pub destination_mode: DestinationMode,
    pub custom_path: Option<PathBuf>,
    pub generated_directory_path: Option<PathBuf>,
    pub use_versioning: bool,
    pub version_suffix: String,
    /// Hold the destination directory lock across scan and copy.
    pub lock_destination: bool,
    /// Create the destination directory when it is missing.
    pub create_destination: bool,
}

impl ExportRequest {
    /// Request with defaults: generated directory, no custom name, no versioning.
    pub fn new(source_path: impl Into<PathBuf>, derived_default_name: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            custom_name: None,
            derived_default_name: derived_default_name.into(),
            destination_mode: DestinationMode::GeneratedDirectory,
            custom_path: None,
            generated_directory_path: None,
            use_versioning: false,
            version_suffix: String::new(),
            lock_destination: false,
            create_destination: false,
        }
    }

    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    pub fn with_generated_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.generated_directory_path = Some(dir.into());
        self
    }

    pub fn with_custom_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.destination_mode = DestinationMode::CustomPath;
        self.custom_path = Some(dir.into());
        self
    }

    pub fn with_versioning(mut self, suffix: impl Into<String>) -> Self {
        self.use_versioning = true;
        self.version_suffix = suffix.into();
        self
    }
}

/// Resolved naming decision, before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    pub base_name: String,
    pub destination_dir: PathBuf,
    pub file_name: String,
    /// Chosen version when versioning is on.
    pub version: Option<u64>,
    /// Entries in the destination matching the version pattern.
    pub previous_versions: usize,
}

impl ExportPlan {
    pub fn final_path(&self) -> PathBuf {
        self.destination_dir.join(&self.file_name)
    }
}

/// Successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exported {
    pub final_path: PathBuf,
    pub version: Option<u64>,
    pub bytes: u64,
}

pub type ExportOutcome = Result<Exported, ExportError>;

/// Compute the plan without side effects. Repeated calls against an unchanged
/// directory return the same plan.
pub fn plan(request: &ExportRequest) -> Result<ExportPlan, ExportError> {
    let (base_name, destination_dir) = name_and_destination(request)?;
    plan_in(request, base_name, destination_dir)
}

fn name_and_destination(request: &ExportRequest) -> Result<(String, PathBuf), ExportError> {
    let base_name = select_base_name(request.custom_name.as_deref(), &request.derived_default_name);
    naming::validate_base_name(&base_name)?;
    let destination_dir = select_destination(
        request.destination_mode,
        request.custom_path.as_deref(),
        request.generated_directory_path.as_deref(),
    )?;
    Ok((base_name, destination_dir))
}

fn plan_in(
    request: &ExportRequest,
    base_name: String,
    destination_dir: PathBuf,
) -> Result<ExportPlan, ExportError> {
    let (file_name, version, previous_versions) = if request.use_versioning {
        naming::validate_version_suffix(&request.version_suffix)?;
        let scan = scan_directory(&destination_dir, &base_name, &request.version_suffix)?;
        let v = scan.next_version();
        (
            versioned_file_name(&base_name, &request.version_suffix, v),
            Some(v),
            scan.matches,
        )
    } else {
        (plain_file_name(&base_name), None, 0)
    };

    debug!(
        base = %base_name,
        dir = %destination_dir.display(),
        file = %file_name,
        ?version,
        previous_versions,
        "export planned"
    );
    Ok(ExportPlan {
        base_name,
        destination_dir,
        file_name,
        version,
        previous_versions,
    })
}

/// A plan whose destination is ready (created and locked when requested).
/// Dropping it without committing releases the lock and writes nothing.
#[derive(Debug)]
pub struct PreparedExport {
    plan: ExportPlan,
    source_path: PathBuf,
    _lock: Option<DirLock>,
}

impl PreparedExport {
    pub fn plan(&self) -> &ExportPlan {
        &self.plan
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Check the source and copy it to the planned path.
    pub fn commit(self) -> ExportOutcome {
        if shutdown::is_requested() {
            return Err(ExportError::Interrupted);
        }
        if !self.source_path.is_file() {
            return Err(ExportError::SourceNotFound(self.source_path));
        }

        let final_path = self.plan.final_path();
        let bytes = copy_overwrite(&self.source_path, &final_path)?;
        info!(src = %self.source_path.display(), dest = %final_path.display(), bytes, "model exported");
        Ok(Exported {
            final_path,
            version: self.plan.version,
            bytes,
        })
    }
}

/// Select name and destination, prepare the directory, and plan.
pub fn prepare(request: &ExportRequest) -> Result<PreparedExport, ExportError> {
    let (base_name, destination_dir) = name_and_destination(request)?;

    if request.create_destination && !destination_dir.is_dir() {
        fs::create_dir_all(&destination_dir)
            .map_err(io_error_with_help("create destination directory", &destination_dir))?;
        info!(dir = %destination_dir.display(), "created destination directory");
    }

    let lock = if request.lock_destination {
        let guard = acquire_dir_lock(&destination_dir)
            .map_err(io_error_with_help("lock destination directory", &destination_dir))?;
        Some(guard)
    } else {
        None
    };

    let plan = plan_in(request, base_name, destination_dir)?;
    Ok(PreparedExport {
        plan,
        source_path: request.source_path.clone(),
        _lock: lock,
    })
}

/// Resolve and perform the export in one step.
pub fn resolve(request: &ExportRequest) -> ExportOutcome {
    prepare(request)?.commit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn source(dir: &assert_fs::TempDir) -> PathBuf {
        let src = dir.child("run").child("in.osm");
        src.write_str("OS:Version,\n  3.7.0;\n").unwrap();
        src.path().to_path_buf()
    }

    #[test]
    fn plain_name_without_versioning() {
        let dir = assert_fs::TempDir::new().unwrap();
        let out = dir.child("reports");
        out.create_dir_all().unwrap();
        out.child("house1.osm").touch().unwrap();

        let req = ExportRequest::new(source(&dir), "house").with_generated_dir(out.path());
        let done = resolve(&req).unwrap();
        assert_eq!(done.final_path, out.path().join("house.osm"));
        assert_eq!(done.version, None);
        out.child("house.osm").assert("OS:Version,\n  3.7.0;\n");
    }

    #[test]
    fn plan_is_idempotent() {
        let dir = assert_fs::TempDir::new().unwrap();
        let out = dir.child("reports");
        out.create_dir_all().unwrap();
        out.child("house_v2.osm").touch().unwrap();

        let req = ExportRequest::new(source(&dir), "house")
            .with_generated_dir(out.path())
            .with_versioning("_v");
        let a = plan(&req).unwrap();
        let b = plan(&req).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.file_name, "house_v3.osm");
    }

    #[test]
    fn dropping_prepared_export_writes_nothing() {
        let dir = assert_fs::TempDir::new().unwrap();
        let out = dir.child("reports");
        out.create_dir_all().unwrap();

        let req = ExportRequest::new(source(&dir), "house")
            .with_generated_dir(out.path())
            .with_versioning("_v");
        let prepared = prepare(&req).unwrap();
        assert_eq!(prepared.plan().file_name, "house_v1.osm");
        drop(prepared);
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
