//! Run configuration and its resolution from flags, environment, and trso.yml
//!
//! The CLI gathers flag/environment values into [`ConfigOverrides`], optionally
//! loads a [`ConfigFile`], and resolves both into one [`Config`] that is passed
//! by reference to everything else. Nothing below the CLI reads the
//! environment.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Config file names looked up in the working directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["trso.yml", "trso.yaml"];

const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

const DEFAULT_LEDGER_TABLE: &str = "migrations";

const MEMORY_PATH: &str = ":memory:";

/// Embedded engine used in local mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocalEngine {
    /// SQLite database file (default)
    #[default]
    Sqlite,
    /// DuckDB database file
    #[serde(rename = "duckdb")]
    DuckDb,
}

impl fmt::Display for LocalEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalEngine::Sqlite => write!(f, "sqlite"),
            LocalEngine::DuckDb => write!(f, "duckdb"),
        }
    }
}

impl FromStr for LocalEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(LocalEngine::Sqlite),
            "duckdb" => Ok(LocalEngine::DuckDb),
            other => Err(format!(
                "unknown local engine '{other}' (expected 'sqlite' or 'duckdb')"
            )),
        }
    }
}

/// Where the migrations are applied
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// Embedded database file (or `:memory:`)
    Local { path: String, engine: LocalEngine },
    /// Networked libSQL endpoint
    Remote { url: String, token: String },
}

impl DatabaseTarget {
    /// Path or URL of the database, safe to print
    pub fn location(&self) -> &str {
        match self {
            DatabaseTarget::Local { path, .. } => path,
            DatabaseTarget::Remote { url, .. } => url,
        }
    }
}

impl fmt::Debug for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseTarget::Local { path, engine } => f
                .debug_struct("Local")
                .field("path", path)
                .field("engine", engine)
                .finish(),
            DatabaseTarget::Remote { url, .. } => f
                .debug_struct("Remote")
                .field("url", url)
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// Optional settings read from `trso.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Use an embedded database instead of a remote endpoint
    #[serde(default)]
    pub local: Option<bool>,

    /// Database file path (local) or endpoint URL (remote)
    #[serde(default)]
    pub url: Option<String>,

    /// Auth token for the remote endpoint
    #[serde(default)]
    pub token: Option<String>,

    /// Migrations directory, relative to the config file
    #[serde(default)]
    pub migrations_path: Option<String>,

    /// Embedded engine for local mode
    #[serde(default)]
    pub engine: Option<LocalEngine>,

    /// Ledger table name
    #[serde(default)]
    pub table: Option<String>,

    /// Directory containing the config file; relative paths resolve against it
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut file: ConfigFile =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        file.base_dir = path.parent().map(Path::to_path_buf);
        Ok(file)
    }

    /// Look for `trso.yml` or `trso.yaml` in a directory.
    ///
    /// Returns `Ok(None)` when neither exists.
    pub fn discover(dir: &Path) -> CoreResult<Option<Self>> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                log::debug!("Using config file {}", path.display());
                return Self::load(&path).map(Some);
            }
        }
        Ok(None)
    }

    fn resolve_path(&self, value: &str, cwd: &Path) -> PathBuf {
        let base = self.base_dir.as_deref().unwrap_or(cwd);
        base.join(value)
    }
}

/// Values taken from command-line flags or environment variables.
///
/// Every field is optional; unset fields fall back to the config file and then
/// to defaults.
#[derive(Clone, Default)]
pub struct ConfigOverrides {
    pub local: Option<bool>,
    pub url: Option<String>,
    pub token: Option<String>,
    pub migrations_path: Option<String>,
    pub engine: Option<LocalEngine>,
    pub table: Option<String>,
}

/// Fully resolved run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database the migrations are applied to
    pub target: DatabaseTarget,

    /// Directory containing the `.sql` migration files
    pub migrations_dir: PathBuf,

    /// Name of the ledger table
    pub ledger_table: String,
}

impl Config {
    /// Merge overrides, an optional config file, and defaults.
    ///
    /// Precedence is overrides > config file > defaults. Relative paths from
    /// overrides resolve against `cwd`; relative paths from the config file
    /// resolve against the file's directory.
    pub fn resolve(
        overrides: ConfigOverrides,
        file: Option<ConfigFile>,
        cwd: &Path,
    ) -> CoreResult<Self> {
        let file = file.unwrap_or_default();
        let migrations_dir = Self::resolve_migrations_dir(&overrides, Some(&file), cwd);

        let local = overrides.local.or(file.local).unwrap_or(false);
        let engine = overrides.engine.or(file.engine).unwrap_or_default();

        let url = match non_empty(overrides.url) {
            Some(url) => url,
            None => match non_empty(file.url.clone()) {
                Some(url) if local && url != MEMORY_PATH => {
                    file.resolve_path(&url, cwd).display().to_string()
                }
                Some(url) => url,
                None => {
                    return Err(CoreError::ConfigInvalid {
                        message: "database path or URL is required (set TRSO_PATH_URL or --url)"
                            .to_string(),
                    })
                }
            },
        };

        let target = if local {
            DatabaseTarget::Local { path: url, engine }
        } else {
            let token = non_empty(overrides.token)
                .or_else(|| non_empty(file.token.clone()))
                .ok_or_else(|| CoreError::ConfigInvalid {
                    message: "an auth token is required for remote databases (set TRSO_TOKEN or --token, or enable local mode)"
                        .to_string(),
                })?;
            DatabaseTarget::Remote { url, token }
        };

        let ledger_table = non_empty(overrides.table)
            .or_else(|| non_empty(file.table.clone()))
            .unwrap_or_else(|| DEFAULT_LEDGER_TABLE.to_string());

        let config = Config {
            target,
            migrations_dir,
            ledger_table,
        };
        config.validate()?;
        Ok(config)
    }

    /// Resolve only the migrations directory.
    ///
    /// Commands that never touch the database use this so they work without a
    /// URL or token.
    pub fn resolve_migrations_dir(
        overrides: &ConfigOverrides,
        file: Option<&ConfigFile>,
        cwd: &Path,
    ) -> PathBuf {
        if let Some(path) = non_empty(overrides.migrations_path.clone()) {
            return cwd.join(path);
        }
        match file.and_then(|f| non_empty(f.migrations_path.clone()).map(|p| (f, p))) {
            Some((file, path)) => file.resolve_path(&path, cwd),
            None => cwd.join(DEFAULT_MIGRATIONS_DIR),
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.ledger_table.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "ledger table name cannot be empty".to_string(),
            });
        }

        if let DatabaseTarget::Remote { url, .. } = &self.target {
            if !url.contains("://") {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "remote URL '{url}' has no scheme; use libsql://, https:// or http://, or enable local mode"
                    ),
                });
            }
        }

        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
