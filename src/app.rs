//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler, and runs
//! the export measure against the workflow root.

use anyhow::{Context, Result};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use osm_export::cli::Args;
use osm_export::config::{create_template_config, load_config, LoadResult, CONFIG_ENV};
use osm_export::export::absolutize;
use osm_export::host::RunStatus;
use osm_export::output as out;
use osm_export::{default_config_path, shutdown, Config, ExportModelMeasure, RecordingRunner, Runner, Workflow};

use crate::logging::init_tracing;

/// Run the CLI application. Measure failures are already reported by the runner
/// and only change the exit code.
pub fn run(args: Args) -> Result<ExitCode> {
    // Config housekeeping runs before logging init
    if args.print_config {
        print_config_location();
        return Ok(ExitCode::SUCCESS);
    }
    if args.init_config {
        let path = default_config_path()?;
        create_template_config(&path)?;
        out::print_success(&format!("A template osm_export config was written to: {}", path.display()));
        out::print_info("Edit it to set defaults such as `custom_name`, `destination` and `use_versioning`; CLI flags still override it.");
        return Ok(ExitCode::SUCCESS);
    }

    let (mut cfg, loaded_from) = match load_config()? {
        LoadResult::Loaded(path, cfg) => (cfg, Some(path)),
        LoadResult::Missing(_) => (Config::default(), None),
    };
    args.apply_overrides(&mut cfg);

    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // Dropped on interrupt so the file appender flushes
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; shutting down gracefully...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .context("install signal handler")?;
    }

    if let Some(path) = &loaded_from {
        debug!(config = %path.display(), "using config file");
    }
    debug!(?args, "starting osm_export");

    let result = run_measure(&args, &cfg);

    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }
    result
}

fn run_measure(args: &Args, cfg: &Config) -> Result<ExitCode> {
    let root = absolutize(&args.resolved_root()).context("resolve workflow root")?;
    let mut workflow = Workflow::new(&root);
    if let Some(dir) = &cfg.generated_dir {
        workflow = workflow.with_generated_dir(absolutize(dir).context("resolve generated files directory")?);
    }

    let measure = ExportModelMeasure::new(cfg.measure_options());
    info!(measure = measure.name(), root = %root.display(), "running measure");

    let mut runner = RecordingRunner::echoing();
    let ok = measure.run(&mut runner, &workflow, &cfg.to_user_arguments());

    match runner.status() {
        RunStatus::Success if ok => Ok(ExitCode::SUCCESS),
        status => {
            error!(%status, errors = runner.errors().len(), "measure did not succeed");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_config_location() {
    if let Some(cfg_env) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        out::print_info(&format!(
            "Using {CONFIG_ENV} (explicit):\n  {}\n",
            cfg_env.to_string_lossy()
        ));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default osm_export config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run with --init-config to create a template.");
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}
