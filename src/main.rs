//! Candybug CLI - play the minigame in a terminal or drive it from scripts.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Candybug - a grid-walking narrative minigame
#[derive(Parser, Debug)]
#[command(name = "candybug")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively in the terminal
    Play {
        /// Config file (JSON, default: built-in game)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Override the tick rate in Hz (10-240)
        #[arg(long)]
        tick_rate: Option<u32>,

        /// Append logs to this file (default: no logging)
        #[arg(long)]
        log: Option<std::path::PathBuf>,
    },

    /// Run an input script headlessly and report the result
    Run {
        /// Input script file (JSON)
        #[arg(short, long, required = true)]
        script: std::path::PathBuf,

        /// Config file (JSON, default: built-in game)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Validate a config file and summarize its map
    Check {
        /// Config file (JSON, default: built-in game)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let sink = match &args.command {
        Commands::Play { log, .. } => log
            .clone()
            .map_or(cli::LogSink::Off, cli::LogSink::File),
        Commands::Run { .. } | Commands::Check { .. } => cli::LogSink::Stderr,
    };

    let result = cli::init_tracing(sink).and_then(|()| match args.command {
        Commands::Play {
            config,
            tick_rate,
            log: _,
        } => cli::play::execute(config, tick_rate),

        Commands::Run {
            script,
            config,
            format,
        } => cli::run::execute(script, config, format),

        Commands::Check { config } => cli::check::execute(config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
