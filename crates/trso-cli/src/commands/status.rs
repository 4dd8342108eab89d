//! Status command implementation

use anyhow::Result;
use trso_migrate::{MigrationState, StatusReport};

use crate::cli::GlobalArgs;
use crate::commands::common::run_failed;
use crate::context::RuntimeContext;

const TIMESTAMP_DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

/// Execute the status command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let report = ctx.migrator().status().await.map_err(|e| run_failed(&e))?;

    println!(
        "Migrations in {} ({} @ {})",
        ctx.config.migrations_dir.display(),
        ctx.config.ledger_table,
        ctx.config.target.location()
    );
    for line in render(&report) {
        println!("{line}");
    }
    Ok(())
}

/// One line per migration, orphaned ledger rows, then a summary
fn render(report: &StatusReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.migrations.len() + report.orphaned.len() + 2);

    for migration in &report.migrations {
        let line = match &migration.state {
            MigrationState::Applied { applied_at } => format!(
                "  applied   {}  {}",
                applied_at.format(TIMESTAMP_DISPLAY),
                migration.name
            ),
            MigrationState::Pending => format!("  pending   {:19}  {}", "", migration.name),
        };
        lines.push(line);
    }

    for orphan in &report.orphaned {
        lines.push(format!(
            "  orphaned  {}  {} (file missing)",
            orphan.applied_at.format(TIMESTAMP_DISPLAY),
            orphan.name
        ));
    }

    lines.push(String::new());
    let mut summary = if report.migrations.is_empty() {
        "No migration files found".to_string()
    } else {
        format!(
            "{} applied, {} pending",
            report.applied_count(),
            report.pending_count()
        )
    };
    if !report.orphaned.is_empty() {
        summary.push_str(&format!(", {} orphaned", report.orphaned.len()));
    }
    lines.push(summary);
    lines
}
