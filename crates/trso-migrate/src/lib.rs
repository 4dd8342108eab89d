//! trso-migrate - Migration engine for trso
//!
//! [`Migrator`] compares the `.sql` files of a directory with the ledger
//! table and applies the missing ones in file-name order, recording each one
//! as soon as it succeeds. [`Ledger`] owns every read and write of that table.

pub mod engine;
pub mod error;
pub mod ledger;

pub use engine::{MigrationState, MigrationStatus, Migrator, RunPhase, RunReport, StatusReport};
pub use error::{MigrateError, MigrateResult};
pub use ledger::{AppliedMigration, Ledger};
