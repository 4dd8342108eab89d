//! The applied-migration ledger.
//!
//! One row per successfully applied migration, keyed by file name. Rows are
//! only ever inserted; the engine never updates or deletes them.

use crate::error::{MigrateError, MigrateResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::BTreeSet;
use trso_core::sql_utils::{quote_ident, quote_literal};
use trso_db::{Database, DbError, SqlValue};

/// Format of the `applied_at` column (UTC, millisecond precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A ledger row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// Reads and writes the ledger table through a [`Database`]
pub struct Ledger<'a> {
    db: &'a dyn Database,
    name: String,
    table: String,
}

impl<'a> Ledger<'a> {
    pub fn new(db: &'a dyn Database, table: &str) -> Self {
        Self {
            db,
            name: table.to_string(),
            table: quote_ident(table),
        }
    }

    /// Create the ledger table if it does not exist yet.
    pub async fn ensure(&self) -> MigrateResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (name TEXT PRIMARY KEY, applied_at TEXT NOT NULL)",
            self.table
        );
        self.db
            .execute(&sql)
            .await
            .map_err(|e| MigrateError::storage("create", e))?;
        Ok(())
    }

    /// Names of every recorded migration.
    pub async fn load_applied(&self) -> MigrateResult<BTreeSet<String>> {
        let sql = format!("SELECT name FROM {}", self.table);
        let rows = match self.db.query(&sql).await {
            Ok(rows) => rows,
            Err(e) => return Err(self.read_failed(e).await),
        };

        rows.column(0)
            .map(|v| text_value(v, "name").map_err(|e| MigrateError::storage("read", e)))
            .collect()
    }

    /// Whether `name` already has a ledger row.
    pub async fn contains(&self, name: &str) -> MigrateResult<bool> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE name = {}",
            self.table,
            quote_literal(name)
        );
        let rows = self
            .db
            .query(&sql)
            .await
            .map_err(|e| MigrateError::storage("lookup", e))?;

        Ok(rows.scalar().and_then(SqlValue::as_i64).unwrap_or(0) > 0)
    }

    /// Record `name` as applied now.
    pub async fn record(&self, name: &str) -> MigrateResult<()> {
        self.record_at(name, Utc::now()).await
    }

    /// Record `name` with an explicit timestamp.
    pub async fn record_at(&self, name: &str, applied_at: DateTime<Utc>) -> MigrateResult<()> {
        if self.contains(name).await? {
            return Err(MigrateError::DuplicateRecord {
                name: name.to_string(),
            });
        }

        let sql = format!(
            "INSERT INTO {} (name, applied_at) VALUES ({}, {})",
            self.table,
            quote_literal(name),
            quote_literal(&applied_at.format(TIMESTAMP_FORMAT).to_string())
        );
        self.db
            .execute(&sql)
            .await
            .map_err(|e| MigrateError::storage("insert", e))?;
        Ok(())
    }

    /// Every ledger row, ordered by name.
    pub async fn list(&self) -> MigrateResult<Vec<AppliedMigration>> {
        let sql = format!("SELECT name, applied_at FROM {} ORDER BY name", self.table);
        let rows = match self.db.query(&sql).await {
            Ok(rows) => rows,
            Err(e) => return Err(self.read_failed(e).await),
        };

        rows.rows
            .iter()
            .map(|row| -> Result<AppliedMigration, DbError> {
                let name = text_value(row.first().unwrap_or(&SqlValue::Null), "name")?;
                let raw = text_value(row.get(1).unwrap_or(&SqlValue::Null), "applied_at")?;
                Ok(AppliedMigration {
                    applied_at: parse_timestamp(&raw)?,
                    name,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MigrateError::storage("read", e))
    }

    /// Classify a failed ledger read.
    ///
    /// A table that still answers for `file_name` was written by an older
    /// tool under the same name and gets its own error.
    async fn read_failed(&self, source: DbError) -> MigrateError {
        let legacy = format!("SELECT file_name FROM {} LIMIT 0", self.table);
        if self.db.query(&legacy).await.is_ok() {
            return MigrateError::LegacyLedger {
                table: self.name.clone(),
            };
        }
        MigrateError::storage("read", source)
    }
}

fn text_value(value: &SqlValue, column: &str) -> Result<String, DbError> {
    value.as_text().map(str::to_string).ok_or_else(|| {
        DbError::ExecutionError(format!("ledger column '{column}' holds {value:?}, expected text"))
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DbError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|ts| ts.and_utc())
        .map_err(|e| DbError::ExecutionError(format!("invalid applied_at '{raw}': {e}")))
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
