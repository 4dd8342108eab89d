//! Remote libSQL backend (sqld / Turso)
//!
//! The connection is opened on first use, so building a backend never touches
//! the network. Calls are serialized through one connection; each
//! [`Database::execute_batch`] runs inside its own transaction.

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use crate::value::{Rows, SqlValue};
use async_trait::async_trait;
use libsql::{Builder, Connection, Value};
use tokio::sync::{Mutex, MutexGuard};

/// URL schemes accepted for remote databases
const REMOTE_SCHEMES: &[&str] = &["libsql", "https", "http"];

/// Remote libSQL database backend
pub struct RemoteBackend {
    url: String,
    token: String,
    conn: Mutex<Option<Connection>>,
}

impl RemoteBackend {
    /// Create a backend for `url` (`libsql://`, `https://` or `http://`).
    ///
    /// No request is made until the first statement runs.
    pub fn new(url: &str, token: &str) -> DbResult<Self> {
        check_url(url)?;
        Ok(Self {
            url: url.to_string(),
            token: token.to_string(),
            conn: Mutex::new(None),
        })
    }

    async fn open(&self) -> DbResult<Connection> {
        log::debug!("Opening libSQL connection to {}", self.url);
        let db = Builder::new_remote(self.url.clone(), self.token.clone())
            .build()
            .await
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", self.url)))?;
        db.connect()
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", self.url)))
    }

    /// Lock the connection slot, opening the connection on first use
    async fn lock(&self) -> DbResult<MutexGuard<'_, Option<Connection>>> {
        let mut slot = self.conn.lock().await;
        if slot.is_none() {
            *slot = Some(self.open().await?);
        }
        Ok(slot)
    }
}

fn opened(slot: &Option<Connection>) -> DbResult<&Connection> {
    slot.as_ref()
        .ok_or_else(|| DbError::ConnectionError("connection is not open".to_string()))
}

fn to_sql_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(n) => SqlValue::Integer(n),
        Value::Real(f) => SqlValue::Real(f),
        Value::Text(t) => SqlValue::Text(t),
        Value::Blob(b) => SqlValue::Blob(b),
    }
}

#[async_trait]
impl Database for RemoteBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        let slot = self.lock().await?;
        let conn = opened(&slot)?;
        let affected = conn
            .execute(sql, ())
            .await
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))?;
        usize::try_from(affected).map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let slot = self.lock().await?;
        let conn = opened(&slot)?;
        let tx = conn.transaction().await?;
        match tx.execute_batch(sql).await {
            Ok(_) => {
                tx.commit().await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    log::warn!("Rollback after failed batch also failed: {rollback}");
                }
                Err(e.into())
            }
        }
    }

    async fn query(&self, sql: &str) -> DbResult<Rows> {
        let slot = self.lock().await?;
        let conn = opened(&slot)?;
        let mut cursor = conn
            .query(sql, ())
            .await
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))?;

        let width = cursor.column_count();
        let columns = (0..width)
            .map(|i| cursor.column_name(i).unwrap_or_default().to_string())
            .collect();

        let mut rows = Vec::new();
        while let Some(row) = cursor.next().await? {
            let values = (0..width)
                .map(|i| row.get_value(i).map(to_sql_value))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(values);
        }

        Ok(Rows { columns, rows })
    }

    fn db_type(&self) -> &'static str {
        "libsql-remote"
    }
}

/// Reject URLs the libSQL client cannot talk to before any connection is made
pub(crate) fn check_url(url: &str) -> DbResult<()> {
    let (scheme, rest) = url
        .split_once("://")
        .ok_or_else(|| DbError::ConnectionError(format!("URL '{url}' has no scheme")))?;

    if !REMOTE_SCHEMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(scheme))
    {
        return Err(DbError::ConnectionError(format!(
            "unsupported URL scheme '{scheme}' in '{url}'"
        )));
    }
    if rest.trim_end_matches('/').is_empty() {
        return Err(DbError::ConnectionError(format!("URL '{url}' has no host")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "remote_test.rs"]
mod tests;
