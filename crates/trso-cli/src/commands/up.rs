//! Up command implementation - applies pending migrations

use anyhow::Result;

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::{plural, run_failed};
use crate::context::RuntimeContext;

/// Execute the up command
pub(crate) async fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    apply(&ctx, args).await
}

pub(crate) async fn apply(ctx: &RuntimeContext, args: &UpArgs) -> Result<()> {
    let migrator = ctx.migrator();

    if args.dry_run {
        let pending = migrator.plan().await.map_err(|e| run_failed(&e))?;
        if pending.is_empty() {
            println!("Nothing to apply");
        } else {
            println!("Would apply {}:", plural(pending.len()));
            for name in &pending {
                println!("  {name}");
            }
        }
        return Ok(());
    }

    let report = migrator
        .run_with(|name| println!("✓ {name}"))
        .await
        .map_err(|e| run_failed(&e))?;

    if report.is_noop() {
        println!(
            "Nothing to apply ({} already applied)",
            plural(report.skipped)
        );
    } else {
        println!("Applied {}", plural(report.applied.len()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "up_test.rs"]
mod tests;
