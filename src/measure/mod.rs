//! The "Export Model with Measure Changes" reporting measure.
//!
//! Runs after the simulation: finds the parent model next to the workflow, derives
//! the default export name from it, and exports `<root>/run/in.osm` through the
//! versioned exporter. Every failure is reported once through the runner's error sink.

pub mod arguments;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use arguments::{
    export_arguments, validate_user_arguments, ArgValue, ArgumentKind, ArgumentSpec, UserArguments,
};

use crate::errors::ExportError;
use crate::export::{self, derived_default_name, DestinationMode, ExportPlan, ExportRequest, Exported};
use crate::fs_ops::io_error_with_help;
use crate::host::{Runner, WorkflowHost};
use arguments::ArgumentReader;

/// Scratch model the measure manager leaves next to the parent model.
pub const TEMP_MEASURE_MANAGER_OSM: &str = "temp_measure_manager.osm";

/// Behavior switches that are not measure arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeasureOptions {
    /// Hold the destination directory lock from version scan to copy.
    pub lock_destination: bool,
    /// Create a missing destination directory.
    pub create_destination: bool,
    /// Plan and report only; write nothing.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ExportModelMeasure {
    pub options: MeasureOptions,
}

impl ExportModelMeasure {
    pub fn new(options: MeasureOptions) -> Self {
        Self { options }
    }

    pub fn name(&self) -> &'static str {
        "Export Model with Measure Changes"
    }

    pub fn description(&self) -> &'static str {
        "This measure exports the in.osm file created for the simulation, moves it to a specified directory, and renames it. The default name is {name_of_parent_model}_wMeasures.osm, but a custom name can be specified."
    }

    pub fn modeler_description(&self) -> &'static str {
        "Archives the modified OSM file after measures have been applied and simulations have been run. The exported file can be saved to the generated files directory or a custom path, under a custom name and with an optional incrementing version number."
    }

    pub fn arguments(&self) -> Vec<ArgumentSpec> {
        export_arguments()
    }

    /// Run the measure. Returns true on success; the runner holds the messages.
    pub fn run(&self, runner: &mut dyn Runner, host: &dyn WorkflowHost, args: &UserArguments) -> bool {
        let result = match self.build_request(runner, host, args) {
            Ok(request) => self.export(runner, &request),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                debug!(code = e.code(), kind = e.kind(), "measure failed");
                runner.register_error(&e.to_string());
                false
            }
        }
    }

    /// Validate arguments and gather host state into an export request.
    pub fn build_request(
        &self,
        runner: &mut dyn Runner,
        host: &dyn WorkflowHost,
        args: &UserArguments,
    ) -> Result<ExportRequest, ExportError> {
        let schema = self.arguments();
        validate_user_arguments(&schema, args)
            .map_err(|problems| ExportError::InvalidArgument(problems.join("; ")))?;
        let reader = ArgumentReader::new(&schema, args);

        let custom_name = reader.optional_string(arguments::CUSTOM_NAME);
        let destination_label = reader.string_or_default(arguments::DESTINATION_DIR);
        let destination_mode = DestinationMode::parse(&destination_label).ok_or_else(|| {
            ExportError::InvalidArgument(format!("Invalid destination directory option: {destination_label}"))
        })?;
        let custom_path = reader.optional_string(arguments::CUSTOM_PATH).map(PathBuf::from);
        if custom_path.is_some() && destination_mode == DestinationMode::GeneratedDirectory {
            runner.register_warning(
                "You passed a custom file path, however the measure is set to save the model to the \"Generated Files Directory\", please switch this to \"Custom Path\" if you want the measure to use your provided path.",
            );
        }
        let use_versioning = reader.bool_value(arguments::USE_VERSIONING);
        let version_suffix = reader.string_or_default(arguments::VERSION_SUFFIX);

        if host.last_model_path().is_none() {
            return Err(ExportError::NoModelLoaded);
        }

        let root = host.absolute_root_dir();
        let parent_dir = root.parent().unwrap_or(root);
        runner.register_info(&format!("Parent directory is {}", parent_dir.display()));
        let parent_model = find_parent_model(parent_dir)?;

        Ok(ExportRequest {
            source_path: host.run_model_path(),
            custom_name,
            derived_default_name: derived_default_name(&parent_model),
            destination_mode,
            custom_path,
            generated_directory_path: host.file_paths().first().cloned(),
            use_versioning,
            version_suffix,
            lock_destination: self.options.lock_destination,
            create_destination: self.options.create_destination,
        })
    }

    fn export(&self, runner: &mut dyn Runner, request: &ExportRequest) -> Result<(), ExportError> {
        if self.options.dry_run {
            let plan = export::plan(request)?;
            report_plan(runner, request, &plan);
            if !request.source_path.is_file() {
                return Err(ExportError::SourceNotFound(request.source_path.clone()));
            }
            runner.register_final_condition(&format!(
                "Dry-run: would copy '{}' to '{}'",
                request.source_path.display(),
                plan.final_path().display()
            ));
            return Ok(());
        }

        let prepared = export::prepare(request)?;
        report_plan(runner, request, prepared.plan());
        let Exported { final_path, .. } = prepared.commit()?;
        runner.register_info(&format!("Copied and renamed the OSM file to '{}'", final_path.display()));
        runner.register_final_condition(&format!("Exported model to '{}'", final_path.display()));
        Ok(())
    }
}

fn report_plan(runner: &mut dyn Runner, request: &ExportRequest, plan: &ExportPlan) {
    if let Some(version) = plan.version {
        runner.register_info(&format!("Found {} previous model versions", plan.previous_versions));
        runner.register_info(&format!("New version is {}{}", request.version_suffix, version));
        runner.register_info(&format!("Versioned filename will be {}", plan.file_name));
    }
    runner.register_info(&format!("Source path: {}", request.source_path.display()));
    runner.register_info(&format!("Destination path: {}", plan.final_path().display()));
}

/// First `*.osm` in `dir` by name, skipping the measure manager's scratch model.
pub fn find_parent_model(dir: &Path) -> Result<PathBuf, ExportError> {
    let entries = fs::read_dir(dir).map_err(io_error_with_help("list parent model directory", dir))?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == export::MODEL_EXTENSION))
        .filter(|p| p.file_name().is_some_and(|n| n != TEMP_MEASURE_MANAGER_OSM))
        .filter(|p| p.is_file())
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| ExportError::ParentModelNotFound(dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn parent_model_skips_scratch_and_sorts() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("temp_measure_manager.osm").touch().unwrap();
        dir.child("zeta.osm").touch().unwrap();
        dir.child("alpha.osm").touch().unwrap();
        dir.child("notes.txt").touch().unwrap();
        dir.child("dir.osm").create_dir_all().unwrap();

        let got = find_parent_model(dir.path()).unwrap();
        assert_eq!(got, dir.path().join("alpha.osm"));
    }

    #[test]
    fn parent_model_missing() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("temp_measure_manager.osm").touch().unwrap();
        let err = find_parent_model(dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::ParentModelNotFound(_)));
    }
}
