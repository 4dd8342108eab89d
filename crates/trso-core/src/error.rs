//! Error types for trso-core

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// C003: Invalid or missing configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: IO error with file path context
    #[error("[C004] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while discovering or reading migration files
#[derive(Error, Debug)]
pub enum LoadError {
    /// L001: Migrations directory does not exist
    #[error("[L001] Migrations directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// L002: Migrations directory could not be listed
    #[error("[L002] Failed to read migrations directory '{path}': {source}")]
    DirectoryRead {
        path: String,
        source: std::io::Error,
    },

    /// L003: A listed migration file could not be read
    #[error("[L003] Failed to read migration '{name}' ({path}): {source}")]
    FileRead {
        name: String,
        path: String,
        source: std::io::Error,
    },
}

impl LoadError {
    /// Stable name of the error kind, used in user-facing failure messages.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::DirectoryNotFound { .. } => "DirectoryNotFoundError",
            LoadError::DirectoryRead { .. } | LoadError::FileRead { .. } => "DirectoryReadError",
        }
    }

    /// Name of the migration file involved, when the failure is file-specific.
    pub fn migration(&self) -> Option<&str> {
        match self {
            LoadError::FileRead { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Result type alias for LoadError
pub type LoadResult<T> = Result<T, LoadError>;
