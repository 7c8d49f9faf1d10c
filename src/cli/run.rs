//! Run command implementation.

use super::output::format_report;
use super::{load_config, CliError, OutputFormat};
use candybug::{run_script, InputScript, Session};
use std::path::PathBuf;
use tracing::info;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config or script cannot be loaded, or a script
/// step fails.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(
    script: PathBuf,
    config: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref(), None)?;
    let script = InputScript::load(&script)?;
    info!(steps = script.steps.len(), "running script");

    let mut session = Session::new(&config)?;
    let report = run_script(&mut session, &script)?;

    match format {
        OutputFormat::Text => print!("{}", format_report(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    let summary = session.abort();
    info!(ticks = summary.ticks, ending = ?summary.ending, "script finished");
    Ok(())
}
