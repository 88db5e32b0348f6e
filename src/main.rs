use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod domain;
mod host;
mod services;
mod suites;

use cli::{Cli, Commands, SuiteTarget};
use commands::{handle_list, handle_verify, suites_for, Inputs};

mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const CHECKS_FAILED: u8 = 1;
    pub const USAGE: u8 = 2;
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::from(exit_code::SUCCESS),
        Ok(false) => ExitCode::from(exit_code::CHECKS_FAILED),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code::USAGE)
        }
    }
}

/// Returns whether every executed check passed or was skipped.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let inputs = Inputs::load(cli)?;
    match &cli.command {
        Commands::Daemon => handle_verify(cli, &inputs, suites_for(SuiteTarget::Daemon)),
        Commands::Mount => handle_verify(cli, &inputs, suites_for(SuiteTarget::Mount)),
        Commands::All => handle_verify(cli, &inputs, suites_for(SuiteTarget::All)),
        Commands::List { suite } => {
            handle_list(cli, &inputs, suites_for(*suite))?;
            Ok(true)
        }
    }
}

/// Logs go to stderr so `--json` output stays parseable.
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}
