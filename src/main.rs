use anyhow::Result;
use std::process::ExitCode;

mod app;
mod logging;

fn main() -> Result<ExitCode> {
    let args = osm_export::cli::parse();
    app::run(args)
}
