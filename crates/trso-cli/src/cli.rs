//! CLI argument definitions using clap derive API

use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};
use trso_core::{ConfigOverrides, LocalEngine};

/// trso - apply SQL migration files to SQLite, DuckDB, or libSQL databases
#[derive(Parser, Debug)]
#[command(name = "trso")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute (defaults to `up`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use an embedded database file instead of a remote endpoint
    #[arg(
        long,
        global = true,
        env = "TRSO_LOCAL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub local: Option<bool>,

    /// Database file path (local mode) or endpoint URL (remote mode)
    #[arg(long, global = true, env = "TRSO_PATH_URL")]
    pub url: Option<String>,

    /// Auth token for the remote endpoint
    #[arg(long, global = true, env = "TRSO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory containing the .sql migration files
    #[arg(long, global = true, env = "TRSO_MIGRATIONS_PATH")]
    pub migrations_dir: Option<String>,

    /// Embedded engine for local mode (sqlite or duckdb)
    #[arg(long, global = true, env = "TRSO_ENGINE")]
    pub engine: Option<LocalEngine>,

    /// Name of the table that records applied migrations
    #[arg(long, global = true, env = "TRSO_TABLE")]
    pub table: Option<String>,

    /// Config file path (default: trso.yml in the working directory)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

impl GlobalArgs {
    /// Flag and environment values, before the config file is applied
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            local: self.local,
            url: self.url.clone(),
            token: self.token.clone(),
            migrations_path: self.migrations_dir.clone(),
            engine: self.engine,
            table: self.table.clone(),
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all pending migrations in file-name order
    Up(UpArgs),

    /// Show which migrations are applied and which are pending
    Status,

    /// Create a new timestamped migration file
    New(NewArgs),
}

/// Arguments for the up command
#[derive(Args, Debug, Default)]
pub struct UpArgs {
    /// List pending migrations without applying them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Short description, used in the file name
    pub name: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
