//! Error types for the migration engine.

use thiserror::Error;
use trso_core::LoadError;
use trso_db::DbError;

/// Migration run errors. Every variant is fatal for the run.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Migration files could not be listed or read (L001-L003).
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The ledger table could not be created, read, or written (M001).
    #[error("[M001] Ledger {operation} failed: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: DbError,
    },

    /// The ledger already holds a row for this migration (M002).
    #[error("[M002] Migration '{name}' is already recorded in the ledger")]
    DuplicateRecord { name: String },

    /// The migration's SQL failed; nothing from it was kept (M003).
    #[error("[M003] Migration '{name}' failed: {source}")]
    Execution {
        name: String,
        #[source]
        source: DbError,
    },

    /// The migration's SQL ran but could not be recorded (M004).
    #[error(
        "[M004] Migration '{name}' was applied but could not be recorded; \
         inspect the database before running again: {source}"
    )]
    InconsistentState {
        name: String,
        #[source]
        source: Box<MigrateError>,
    },

    /// The ledger table exists with the `(id, file_name)` layout written by
    /// older migration tools (M005).
    #[error(
        "[M005] Ledger table '{table}' has an older (id, file_name) layout; \
         rename it or choose another table with --table or TRSO_TABLE"
    )]
    LegacyLedger { table: String },
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    pub(crate) fn storage(operation: &'static str, source: DbError) -> Self {
        MigrateError::Storage { operation, source }
    }

    /// Stable short name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            MigrateError::Load(e) => e.kind(),
            MigrateError::Storage { .. } | MigrateError::LegacyLedger { .. } => "StorageError",
            MigrateError::DuplicateRecord { .. } => "DuplicateRecordError",
            MigrateError::Execution { .. } => "ExecutionError",
            MigrateError::InconsistentState { .. } => "InconsistentStateError",
        }
    }

    /// Name of the migration the failure is attributed to, if any.
    pub fn migration(&self) -> Option<&str> {
        match self {
            MigrateError::Load(e) => e.migration(),
            MigrateError::DuplicateRecord { name }
            | MigrateError::Execution { name, .. }
            | MigrateError::InconsistentState { name, .. } => Some(name),
            MigrateError::Storage { .. } | MigrateError::LegacyLedger { .. } => None,
        }
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrateError::InconsistentState { .. } => 3,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_migration() {
        let err = MigrateError::Execution {
            name: "002_b.sql".to_string(),
            source: DbError::ExecutionError("syntax error".to_string()),
        };
        assert_eq!(err.kind(), "ExecutionError");
        assert_eq!(err.migration(), Some("002_b.sql"));
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("[M003]"));

        let load = MigrateError::from(LoadError::DirectoryNotFound {
            path: "migrations".to_string(),
        });
        assert_eq!(load.kind(), "DirectoryNotFoundError");
        assert_eq!(load.migration(), None);
        assert!(load.to_string().starts_with("[L001]"));
    }

    #[test]
    fn test_inconsistent_state_exit_code() {
        let err = MigrateError::InconsistentState {
            name: "001_a.sql".to_string(),
            source: Box::new(MigrateError::DuplicateRecord {
                name: "001_a.sql".to_string(),
            }),
        };
        assert_eq!(err.kind(), "InconsistentStateError");
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("[M002]"));
    }
}
