//! New command implementation - creates an empty, timestamped migration file

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use trso_core::Config;

use crate::cli::{GlobalArgs, NewArgs};
use crate::context::{current_dir, load_config_file};

/// Prefix format; sorts lexicographically in creation order
const TIMESTAMP_PREFIX: &str = "%Y%m%d%H%M%S";

/// Execute the new command
pub(crate) async fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let cwd = current_dir()?;
    let file = load_config_file(global, &cwd)?;
    let dir = Config::resolve_migrations_dir(&global.overrides(), file.as_ref(), &cwd);

    let path = create_migration(&dir, &args.name, Utc::now())?;
    println!("Created {}", path.display());
    Ok(())
}

/// Write `<timestamp>_<slug>.sql` into `dir`, creating the directory if needed.
pub(crate) fn create_migration(dir: &Path, name: &str, now: DateTime<Utc>) -> Result<PathBuf> {
    let slug = slugify(name);
    if slug.is_empty() {
        anyhow::bail!(
            "Invalid migration name '{name}': must contain at least one letter or digit"
        );
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let path = dir.join(format!("{}_{slug}.sql", now.format(TIMESTAMP_PREFIX)));
    if path.exists() {
        anyhow::bail!("Migration file already exists: {}", path.display());
    }

    fs::write(&path, format!("-- {}\n", name.trim()))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("Created migration {}", path.display());
    Ok(path)
}

/// Lowercase ASCII letters and digits; every other run of characters becomes `_`
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}

#[cfg(test)]
#[path = "new_test.rs"]
mod tests;
