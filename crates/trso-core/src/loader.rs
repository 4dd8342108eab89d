//! Migration directory loader
//!
//! [`MigrationSource::scan`] lists a directory once and keeps the `.sql` files
//! sorted by name. File contents are only read while iterating, and iteration
//! can be restarted any number of times.

use crate::error::{LoadError, LoadResult};
use crate::migration::{MigrationFile, MigrationName};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File extension of migration files (compared ASCII case-insensitively)
const MIGRATION_EXTENSION: &str = "sql";

/// A discovered migration file whose content has not been read yet
#[derive(Debug, Clone)]
struct SourceEntry {
    name: MigrationName,
    path: PathBuf,
}

/// Ordered, restartable view over the migration files of one directory
#[derive(Debug, Clone)]
pub struct MigrationSource {
    entries: Vec<SourceEntry>,
}

impl MigrationSource {
    /// Discover all migration files in `dir`, sorted by file name.
    ///
    /// Only regular files with a `.sql` extension are kept; sub-directories are
    /// not descended into. An empty directory yields an empty source.
    pub fn scan(dir: &Path) -> LoadResult<Self> {
        let read_dir = fs::read_dir(dir).map_err(|e| {
            if e.kind() == ErrorKind::NotFound || dir.is_file() {
                LoadError::DirectoryNotFound {
                    path: dir.display().to_string(),
                }
            } else {
                LoadError::DirectoryRead {
                    path: dir.display().to_string(),
                    source: e,
                }
            }
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| LoadError::DirectoryRead {
                path: dir.display().to_string(),
                source: e,
            })?;
            let path = entry.path();

            if !path.is_file() || !has_migration_extension(&path) {
                continue;
            }

            let Some(name) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(MigrationName::try_new)
            else {
                log::warn!("Skipping migration with a non UTF-8 name: {}", path.display());
                continue;
            };

            entries.push(SourceEntry { name, path });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        log::debug!(
            "Found {} migration file(s) in {}",
            entries.len(),
            dir.display()
        );

        Ok(Self { entries })
    }

    /// Number of migration files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory contained no migration files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Migration names in apply order, without reading any content
    pub fn names(&self) -> impl Iterator<Item = &MigrationName> {
        self.entries.iter().map(|e| &e.name)
    }

    /// Check whether a migration with this name was discovered
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .binary_search_by(|e| e.name.as_str().cmp(name))
            .is_ok()
    }

    /// Iterate over the migrations in order, reading each file lazily.
    ///
    /// Each call starts a fresh pass from the first file.
    pub fn iter(&self) -> MigrationIter<'_> {
        MigrationIter {
            inner: self.entries.iter(),
        }
    }

    /// Keep only the migrations whose name is not in `applied`, preserving order.
    pub fn pending(&self, applied: &BTreeSet<String>) -> MigrationSource {
        MigrationSource {
            entries: self
                .entries
                .iter()
                .filter(|e| !applied.contains(e.name.as_str()))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MigrationSource {
    type Item = LoadResult<MigrationFile>;
    type IntoIter = MigrationIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over the files of a [`MigrationSource`]
pub struct MigrationIter<'a> {
    inner: std::slice::Iter<'a, SourceEntry>,
}

impl Iterator for MigrationIter<'_> {
    type Item = LoadResult<MigrationFile>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        Some(read_entry(entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for MigrationIter<'_> {}

fn read_entry(entry: &SourceEntry) -> LoadResult<MigrationFile> {
    let content = fs::read_to_string(&entry.path).map_err(|e| LoadError::FileRead {
        name: entry.name.to_string(),
        path: entry.path.display().to_string(),
        source: e,
    })?;
    Ok(MigrationFile::new(entry.name.clone(), content))
}

fn has_migration_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(MIGRATION_EXTENSION))
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
