//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Policy Tracker - Keep a package catalog in sync with policy repositories
#[derive(Parser, Debug)]
#[command(name = "policy-tracker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the tracker configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "POLICY_TRACKER_CONFIG",
        default_value = "tracker.toml"
    )]
    pub config: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Reconcile the catalog with every configured repository
    ///
    /// Examples:
    ///   policy-tracker track                       # All repositories
    ///   policy-tracker track -r gatekeeper         # Only one
    ///   policy-tracker track --bypass-digest-check # Re-register everything
    Track {
        /// Re-register every discovered version, overriding the config file
        #[arg(long)]
        bypass_digest_check: bool,

        /// Only track the named repositories
        #[arg(short, long = "repository")]
        repositories: Vec<String>,

        /// Output the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what the catalog holds for each configured repository
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
