//! Terminal output formatting.

use colored::Colorize;
use triplesync_store::Row;
use triplesync_sync::Diff;

/// Print query solutions, one line per row.
pub fn print_rows(rows: &[Row]) {
    if rows.is_empty() {
        println!("{}", "No results.".dimmed());
        return;
    }

    for (i, row) in rows.iter().enumerate() {
        let bindings: Vec<String> = row
            .iter()
            .map(|(name, term)| format!("{}={}", format!("?{}", name).cyan(), term))
            .collect();
        println!("{}: {}", (i + 1).to_string().dimmed(), bindings.join("  "));
    }
    println!("\n{} rows", rows.len().to_string().bold());
}

/// Print the statements a sync would insert and delete.
pub fn print_diff(diff: &Diff) {
    if diff.is_empty() {
        println!("{}", "No changes.".dimmed());
        return;
    }

    for statement in &diff.to_remove {
        println!("  {} {}", "-".red(), statement);
    }
    for statement in &diff.to_add {
        println!("  {} {}", "+".green(), statement);
    }
    println!(
        "\n{} to add, {} to remove {}",
        diff.to_add.len().to_string().bold(),
        diff.to_remove.len().to_string().bold(),
        "(shared references are checked at sync time)".dimmed()
    );
}
