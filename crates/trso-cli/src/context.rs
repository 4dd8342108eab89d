//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use trso_core::{Config, ConfigFile};
use trso_db::Database;
use trso_migrate::Migrator;

use crate::cli::GlobalArgs;
use crate::commands::common::ExitCode;

/// Resolved configuration plus the open database connection
pub(crate) struct RuntimeContext {
    pub config: Config,
    pub db: Arc<dyn Database>,
}

impl RuntimeContext {
    /// Resolve configuration from flags, environment, and the config file, then
    /// connect to the database.
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let cwd = current_dir()?;
        let config = load_config(args, &cwd)?;
        Self::connect(config)
    }

    /// Connect to the database described by an already resolved config
    pub fn connect(config: Config) -> Result<Self> {
        log::debug!("Resolved configuration: {config:?}");
        let db = match trso_db::connect(&config) {
            Ok(db) => db,
            Err(e) => {
                eprintln!(
                    "✗ Could not open database {}: {e}",
                    config.target.location()
                );
                return Err(ExitCode(2).into());
            }
        };
        Ok(Self { config, db })
    }

    pub fn migrator(&self) -> Migrator {
        Migrator::from_config(self.db.clone(), &self.config)
    }
}

pub(crate) fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to determine the working directory")
}

/// Load the config file named by `--config`, or discover one in `cwd`
pub(crate) fn load_config_file(args: &GlobalArgs, cwd: &Path) -> Result<Option<ConfigFile>> {
    match &args.config {
        Some(path) => {
            let file = ConfigFile::load(&cwd.join(path))
                .context("Failed to load configuration file")?;
            Ok(Some(file))
        }
        None => ConfigFile::discover(cwd).context("Failed to load configuration file"),
    }
}

/// Resolve the full run configuration
pub(crate) fn load_config(args: &GlobalArgs, cwd: &Path) -> Result<Config> {
    let file = load_config_file(args, cwd)?;
    Config::resolve(args.overrides(), file, cwd).context("Invalid configuration")
}
