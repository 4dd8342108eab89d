//! Database trait definition

use crate::error::DbResult;
use crate::value::Rows;
use async_trait::async_trait;

/// Database abstraction trait for trso
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single SQL statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute one or more SQL statements as a single atomic unit.
    ///
    /// Either every statement takes effect or none does (as far as the
    /// backend's transactions allow; DDL on some engines is not transactional).
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and return all of its rows
    async fn query(&self, sql: &str) -> DbResult<Rows>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
