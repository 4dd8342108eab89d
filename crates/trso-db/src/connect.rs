//! Backend selection from the resolved configuration

use crate::duckdb::DuckDbBackend;
use crate::error::DbResult;
use crate::remote::RemoteBackend;
use crate::sqlite::SqliteBackend;
use crate::traits::Database;
use std::sync::Arc;
use trso_core::{Config, DatabaseTarget, LocalEngine};

/// Open the database the configuration points at.
///
/// Local targets open (or create) the file immediately; remote targets connect
/// on first use.
pub fn connect(config: &Config) -> DbResult<Arc<dyn Database>> {
    connect_target(&config.target)
}

/// Open a database from its target description alone
pub fn connect_target(target: &DatabaseTarget) -> DbResult<Arc<dyn Database>> {
    let db: Arc<dyn Database> = match target {
        DatabaseTarget::Local {
            path,
            engine: LocalEngine::Sqlite,
        } => Arc::new(SqliteBackend::new(path)?),
        DatabaseTarget::Local {
            path,
            engine: LocalEngine::DuckDb,
        } => Arc::new(DuckDbBackend::new(path)?),
        DatabaseTarget::Remote { url, token } => Arc::new(RemoteBackend::new(url, token)?),
    };
    log::debug!("Connected to {} ({})", target.location(), db.db_type());
    Ok(db)
}
