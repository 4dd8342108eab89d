//! Helpers shared by the command implementations

use std::fmt;
use trso_migrate::MigrateError;

/// Error type that carries a process exit code.
///
/// Commands print their own failure output and return
/// `Err(ExitCode(N).into())`; `main` turns it into the process status.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Output was already printed by the command
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Print a failed run and convert it into the matching exit code.
pub(crate) fn run_failed(err: &MigrateError) -> anyhow::Error {
    match err.migration() {
        Some(name) => eprintln!("✗ {name} failed ({}): {err}", err.kind()),
        None => eprintln!("✗ Migration run failed ({}): {err}", err.kind()),
    }
    ExitCode(err.exit_code()).into()
}

/// "1 migration" / "2 migrations"
pub(crate) fn plural(count: usize) -> String {
    if count == 1 {
        "1 migration".to_string()
    } else {
        format!("{count} migrations")
    }
}
