//! CLI command implementations for Candybug.

pub(crate) mod check;
pub(crate) mod play;
pub(crate) mod run;

mod output;

use candybug::{Config, ConfigError, ScriptError};
use clap::ValueEnum;
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Where log lines go.
#[derive(Debug)]
pub(crate) enum LogSink {
    /// Standard error.
    Stderr,
    /// Append to a file.
    File(PathBuf),
    /// Drop everything.
    Off,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` selects the filter; the default is `info`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub(crate) fn init_tracing(sink: LogSink) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    match sink {
        LogSink::Stderr => builder.with_writer(std::io::stderr).init(),
        LogSink::File(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| CliError::new(format!("Failed to open {}: {e}", path.display())))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        LogSink::Off => {}
    }
    Ok(())
}

/// Load a config file (or the defaults) and apply a tick-rate override.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the result is invalid.
pub(crate) fn load_config(path: Option<&Path>, tick_rate: Option<u32>) -> Result<Config, CliError> {
    let mut config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(hz) = tick_rate {
        config.tuning.tick_rate_hz = hz;
    }
    config.validate()?;
    Ok(config)
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ScriptError> for CliError {
    fn from(e: ScriptError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}
