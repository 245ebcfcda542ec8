//! CLI parse: clap types for Stackwright. No behavior; definitions only.

use crate::account::Account;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Stackwright CLI - declarative stack lifecycle management
#[derive(Parser, Debug)]
#[command(name = "stackwright", version)]
#[command(about = "Drive stacks to completion and federate into accounts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (where stackwright.toml is looked up)
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (replaces the workspace stackwright.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (when --log-output file)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Lifecycle event output: text (log lines) or json (one object per line on stderr)
    #[arg(long, global = true, value_enum, default_value_t = EventFormat::Text)]
    pub events: EventFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventFormat {
    Text,
    Json,
}

/// Where engine calls run and with which credentials.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Directory account to federate into (logical name or account id)
    #[arg(long)]
    pub account: Option<Account>,

    /// Named profile for ambient credentials (ignored with --account)
    #[arg(long)]
    pub profile: Option<String>,

    /// Region (overrides configuration)
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, update or recreate a stack and wait for it to settle
    Apply {
        /// Stack name
        #[arg(long)]
        stack_name: String,
        /// Template file whose contents are sent verbatim
        #[arg(long)]
        template: PathBuf,
        /// Template parameter as KEY=VALUE (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Delete a stack and wait until it is gone
    Delete {
        /// Stack name
        stack_name: String,
        #[command(flatten)]
        target: TargetArgs,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Mint temporary credentials for a directory account and print export lines
    AssumeRole {
        /// Directory account (logical name or account id)
        #[arg(long)]
        account: Account,
        /// Region (overrides configuration)
        #[arg(long)]
        region: Option<String>,
        /// Role session name (default: generated)
        #[arg(long)]
        session_name: Option<String>,
    },
    /// List the account directory
    Accounts,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Apply { .. } => "apply",
            Commands::Delete { .. } => "delete",
            Commands::AssumeRole { .. } => "assume-role",
            Commands::Accounts => "accounts",
        }
    }
}
