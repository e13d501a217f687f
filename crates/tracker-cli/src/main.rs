//! Policy Tracker CLI
//!
//! Reconciles a package catalog with the policy packages found in each
//! configured repository.

mod adapters;
mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Track {
            bypass_digest_check,
            repositories,
            json,
        } => commands::run_track(&cli.config, bypass_digest_check, &repositories, json),
        Commands::Status { json } => commands::run_status(&cli.config, json),
    }
}

/// Log to stderr, filtered by `RUST_LOG` when set.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{}: failed to set tracing subscriber: {e}", "warning".yellow());
    }
    tracing::debug!("Verbose mode enabled");
}
