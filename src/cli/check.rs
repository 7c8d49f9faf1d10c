//! Config validation command implementation.

use super::output::format_check;
use super::{load_config, CliError};
use std::path::PathBuf;
use tracing::info;

/// Execute the check command.
///
/// # Errors
///
/// Returns an error if the config cannot be read or is invalid.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(config: Option<PathBuf>) -> Result<(), CliError> {
    match &config {
        Some(path) => println!("Checking: {}", path.display()),
        None => println!("Checking: built-in defaults"),
    }
    println!();

    let loaded = load_config(config.as_deref(), None)?;
    let map = loaded.build_map()?;
    info!(width = map.width(), height = map.height(), "config valid");

    print!("{}", format_check(&loaded, &map));
    println!();
    println!("Validation successful!");

    Ok(())
}
