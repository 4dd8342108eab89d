//! trso-db - Database abstraction layer for trso
//!
//! This crate provides the `Database` trait the migration engine is written
//! against, and three implementations: SQLite and DuckDB files for local mode,
//! and a libSQL client for remote mode. [`connect`] picks one from the
//! resolved configuration.

pub mod connect;
pub mod duckdb;
pub mod error;
pub mod remote;
pub mod sqlite;
pub mod traits;
pub mod value;

pub use connect::{connect, connect_target};
pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use remote::RemoteBackend;
pub use sqlite::SqliteBackend;
pub use traits::Database;
pub use value::{Rows, SqlValue};
