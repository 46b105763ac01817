//! Raw SPARQL and connectivity commands.

use anyhow::Result;
use colored::Colorize;

use super::Session;
use crate::output;

/// Execute a raw SELECT query.
pub async fn select(session: &Session, sparql: &str) -> Result<()> {
    let query = with_prefixes(&session.config.uris().prefixes(), sparql);
    let rows = session.client.select_text(&query).await?;
    output::print_rows(&rows);
    Ok(())
}

/// Execute a raw ASK query.
pub async fn ask(session: &Session, sparql: &str) -> Result<()> {
    let query = with_prefixes(&session.config.uris().prefixes(), sparql);
    let answer = session.client.ask_text(&query).await?;
    println!("{}", if answer { "true".green() } else { "false".red() });
    Ok(())
}

pub async fn ping(session: &Session) -> Result<()> {
    let endpoint = session.client.query_endpoint();
    if session.client.health_check().await {
        println!("{} {}", "✓".green(), endpoint);
        Ok(())
    } else {
        println!("{} {}", "✗".red(), endpoint);
        anyhow::bail!("Store at {} is not answering", endpoint)
    }
}

/// Prepend the namespace `PREFIX` lines the query does not declare itself.
fn with_prefixes(prefixes: &str, sparql: &str) -> String {
    let declared = sparql.to_lowercase();
    let mut out = String::new();
    for line in prefixes.lines() {
        let name = line.split_whitespace().nth(1).unwrap_or_default().to_lowercase();
        if !declared.contains(&format!("prefix {}", name)) {
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str(sparql);
    out
}
