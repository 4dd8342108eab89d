//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use crate::value::{Rows, SqlValue};
use async_trait::async_trait;
use duckdb::types::ValueRef;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    /// Execute batch SQL synchronously inside a transaction
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.commit()?;
        Ok(())
    }

    /// Query synchronously.
    ///
    /// DuckDB panics on `stmt.column_count()` before execution, so rows are
    /// collected via `query_map` first and column metadata is read afterwards.
    fn query_sync(&self, sql: &str) -> DbResult<Rows> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;

        let rows: Vec<Vec<SqlValue>> = stmt
            .query_map([], |row| {
                let col_count = row.as_ref().column_count();
                (0..col_count).map(|i| read_column(row, i)).collect()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let column_count = stmt.column_count();
        let columns: Vec<String> = (0..column_count)
            .map(|i| {
                stmt.column_name(i)
                    .map_or("?".to_string(), |v| v.to_string())
            })
            .collect();

        Ok(Rows { columns, rows })
    }
}

/// Convert one DuckDB column into a [`SqlValue`].
///
/// Types without a direct counterpart (dates, decimals, nested values) are
/// rendered as text.
fn read_column(row: &duckdb::Row<'_>, idx: usize) -> duckdb::Result<SqlValue> {
    let value = match row.get_ref(idx)? {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Boolean(b) => SqlValue::Integer(i64::from(b)),
        ValueRef::TinyInt(n) => SqlValue::Integer(n.into()),
        ValueRef::SmallInt(n) => SqlValue::Integer(n.into()),
        ValueRef::Int(n) => SqlValue::Integer(n.into()),
        ValueRef::BigInt(n) => SqlValue::Integer(n),
        ValueRef::UTinyInt(n) => SqlValue::Integer(n.into()),
        ValueRef::USmallInt(n) => SqlValue::Integer(n.into()),
        ValueRef::UInt(n) => SqlValue::Integer(n.into()),
        ValueRef::UBigInt(n) => i64::try_from(n)
            .map(SqlValue::Integer)
            .unwrap_or_else(|_| SqlValue::Text(n.to_string())),
        ValueRef::HugeInt(n) => i64::try_from(n)
            .map(SqlValue::Integer)
            .unwrap_or_else(|_| SqlValue::Text(n.to_string())),
        ValueRef::Float(f) => SqlValue::Real(f.into()),
        ValueRef::Double(f) => SqlValue::Real(f),
        ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
        other => SqlValue::Text(format!("{other:?}")),
    };
    Ok(value)
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query(&self, sql: &str) -> DbResult<Rows> {
        self.query_sync(sql)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
