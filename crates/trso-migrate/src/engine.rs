//! Migration engine
//!
//! A run moves through `Init -> Loaded -> Filtered -> Applying -> Done`, or
//! ends in `Failed` at the first error. Each pending file is executed as one
//! atomic batch and recorded in the ledger immediately afterwards; nothing
//! after a failing file is attempted.

use crate::error::{MigrateError, MigrateResult};
use crate::ledger::{AppliedMigration, Ledger};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use trso_core::{Config, MigrationName, MigrationSource};
use trso_db::Database;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Loaded,
    Filtered,
    Applying,
    Done,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Init => "init",
            RunPhase::Loaded => "loaded",
            RunPhase::Filtered => "filtered",
            RunPhase::Applying => "applying",
            RunPhase::Done => "done",
            RunPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Migrations applied by this run, in order
    pub applied: Vec<String>,

    /// Migrations found on disk that were already in the ledger
    pub skipped: usize,

    pub phase: RunPhase,
}

impl RunReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// State of one migration file as seen by `status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationState {
    Applied { applied_at: DateTime<Utc> },
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub name: MigrationName,
    pub state: MigrationState,
}

/// Per-file status plus ledger rows whose file no longer exists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub migrations: Vec<MigrationStatus>,
    pub orphaned: Vec<AppliedMigration>,
}

impl StatusReport {
    pub fn pending_count(&self) -> usize {
        self.migrations
            .iter()
            .filter(|m| m.state == MigrationState::Pending)
            .count()
    }

    pub fn applied_count(&self) -> usize {
        self.migrations.len() - self.pending_count()
    }
}

/// Applies the migrations of one directory to one database
pub struct Migrator {
    db: Arc<dyn Database>,
    migrations_dir: PathBuf,
    table: String,
}

impl Migrator {
    pub fn new(db: Arc<dyn Database>, migrations_dir: impl Into<PathBuf>, table: &str) -> Self {
        Self {
            db,
            migrations_dir: migrations_dir.into(),
            table: table.to_string(),
        }
    }

    /// Build a migrator for the directory and ledger table named in `config`.
    pub fn from_config(db: Arc<dyn Database>, config: &Config) -> Self {
        Self::new(db, config.migrations_dir.clone(), &config.ledger_table)
    }

    pub fn ledger(&self) -> Ledger<'_> {
        Ledger::new(self.db.as_ref(), &self.table)
    }

    /// Apply every pending migration in order.
    pub async fn run(&self) -> MigrateResult<RunReport> {
        self.run_with(|_| {}).await
    }

    /// Apply every pending migration, calling `on_applied` after each one is
    /// recorded.
    pub async fn run_with<F>(&self, mut on_applied: F) -> MigrateResult<RunReport>
    where
        F: FnMut(&MigrationName) + Send,
    {
        let mut phase = RunPhase::Init;
        match self.apply_pending(&mut phase, &mut on_applied).await {
            Ok(report) => Ok(report),
            Err(e) => {
                transition(&mut phase, RunPhase::Failed);
                Err(e)
            }
        }
    }

    async fn apply_pending(
        &self,
        phase: &mut RunPhase,
        on_applied: &mut (dyn FnMut(&MigrationName) + Send),
    ) -> MigrateResult<RunReport> {
        let ledger = self.ledger();
        ledger.ensure().await?;

        let source = MigrationSource::scan(&self.migrations_dir)?;
        transition(phase, RunPhase::Loaded);

        let applied = ledger.load_applied().await?;
        let pending = source.pending(&applied);
        let skipped = source.len() - pending.len();
        transition(phase, RunPhase::Filtered);

        if pending.is_empty() {
            log::info!("Nothing to apply ({skipped} migration(s) already applied)");
            transition(phase, RunPhase::Done);
            return Ok(RunReport {
                applied: Vec::new(),
                skipped,
                phase: *phase,
            });
        }

        transition(phase, RunPhase::Applying);
        log::info!(
            "Applying {} migration(s) to {}",
            pending.len(),
            self.db.db_type()
        );

        let mut done = Vec::with_capacity(pending.len());
        for file in &pending {
            let file = file?;
            let name = file.name.as_str();

            if file.is_blank() {
                log::warn!("Migration {name} is empty; recording it without executing");
            } else {
                self.db
                    .execute_batch(&file.content)
                    .await
                    .map_err(|source| MigrateError::Execution {
                        name: name.to_string(),
                        source,
                    })?;
            }

            ledger
                .record(name)
                .await
                .map_err(|e| MigrateError::InconsistentState {
                    name: name.to_string(),
                    source: Box::new(e),
                })?;

            log::info!("Applied {name}");
            on_applied(&file.name);
            done.push(file.name.into_inner());
        }

        transition(phase, RunPhase::Done);
        Ok(RunReport {
            applied: done,
            skipped,
            phase: *phase,
        })
    }

    /// Names of the migrations a run would apply, without executing them.
    ///
    /// The ledger table is still created if missing.
    pub async fn plan(&self) -> MigrateResult<Vec<MigrationName>> {
        let ledger = self.ledger();
        ledger.ensure().await?;
        let source = MigrationSource::scan(&self.migrations_dir)?;
        let applied = ledger.load_applied().await?;

        Ok(source.pending(&applied).names().cloned().collect())
    }

    /// Applied/pending state of every migration file, plus orphaned ledger rows.
    pub async fn status(&self) -> MigrateResult<StatusReport> {
        let ledger = self.ledger();
        ledger.ensure().await?;
        let source = MigrationSource::scan(&self.migrations_dir)?;

        let mut recorded: BTreeMap<String, AppliedMigration> = ledger
            .list()
            .await?
            .into_iter()
            .map(|m| (m.name.clone(), m))
            .collect();

        let migrations = source
            .names()
            .map(|name| {
                let state = match recorded.remove(name.as_str()) {
                    Some(row) => MigrationState::Applied {
                        applied_at: row.applied_at,
                    },
                    None => MigrationState::Pending,
                };
                MigrationStatus {
                    name: name.clone(),
                    state,
                }
            })
            .collect();

        Ok(StatusReport {
            migrations,
            orphaned: recorded.into_values().collect(),
        })
    }
}

fn transition(phase: &mut RunPhase, next: RunPhase) {
    log::debug!("Migration run: {phase} -> {next}");
    *phase = next;
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
