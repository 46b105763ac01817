//! Entity sync commands.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use triplesync_core::Statement;

use super::Session;
use crate::output;

#[derive(Args)]
pub struct SyncArgs {
    /// Entity id, e.g. Q42
    pub entity: String,

    /// JSON file holding the entity's statement list
    pub file: PathBuf,

    /// Show what would change without writing to the store
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn execute(args: SyncArgs, session: &Session) -> Result<()> {
    let desired = read_statements(&args.file)?;
    let repo = session.repository();

    if args.dry_run {
        let current = repo.current(&args.entity).await?;
        let changes = triplesync_sync::diff(&current, &desired);
        println!(
            "{} {} {}",
            "Dry run for".bold(),
            args.entity.yellow(),
            format!("({} statements)", desired.len()).dimmed()
        );
        output::print_diff(&changes);
        return Ok(());
    }

    println!("{} {}...", "Syncing".bold(), args.entity.yellow());
    let result = repo.sync(&args.entity, desired).await?;

    if result.changed() == 0 && result.retained == 0 {
        println!("{}", "Already up to date.".dimmed());
        return Ok(());
    }

    println!("\n{}", "Sync complete:".green().bold());
    println!("  Added:    {}", result.added);
    println!("  Removed:  {}", result.removed);
    if result.retained > 0 {
        println!("  Retained: {} {}", result.retained, "(shared references)".dimmed());
    }

    Ok(())
}

pub async fn has_revision(session: &Session, entity: &str, revision: i64) -> Result<()> {
    let present = session.repository().has_revision(entity, revision).await?;

    if present {
        println!("{} {} is at revision {} or later", "✓".green(), entity.yellow(), revision);
    } else {
        println!("{} {} is older than revision {}", "✗".red(), entity.yellow(), revision);
    }

    Ok(())
}

fn read_statements(path: &std::path::Path) -> Result<BTreeSet<Statement>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let statements: Vec<Statement> =
        serde_json::from_str(&content).with_context(|| format!("Invalid statement list in {}", path.display()))?;
    Ok(statements.into_iter().collect())
}
