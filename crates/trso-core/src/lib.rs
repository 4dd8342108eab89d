//! trso-core - Core library for trso
//!
//! This crate provides the resolved run configuration, the error taxonomy for
//! configuration and migration loading, the [`MigrationFile`] type, and the
//! directory loader that turns a migrations folder into an ordered sequence.

pub mod config;
pub mod error;
pub mod loader;
pub mod migration;
pub mod sql_utils;

pub use config::{Config, ConfigFile, ConfigOverrides, DatabaseTarget, LocalEngine};
pub use error::{CoreError, CoreResult, LoadError, LoadResult};
pub use loader::{MigrationIter, MigrationSource};
pub use migration::{MigrationFile, MigrationName};
