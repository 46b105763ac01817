//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use triplesync_core::SyncConfig;
use triplesync_store::SparqlClient;
use triplesync_sync::RdfRepository;

pub mod query;
pub mod sync;

/// Keep entities in a SPARQL triple store in line with their descriptions
#[derive(Parser)]
#[command(name = "triplesync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "TRIPLESYNC_CONFIG", default_value = "triplesync.toml")]
    pub config: PathBuf,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replace an entity's triples with the statements in a JSON file
    Sync(sync::SyncArgs),

    /// Check whether the store holds at least the given revision of an entity
    HasRevision {
        /// Entity id, e.g. Q42
        entity: String,
        /// Revision number
        revision: i64,
    },

    /// Run a raw SPARQL SELECT query
    Query {
        /// SPARQL query string
        sparql: String,
    },

    /// Run a raw SPARQL ASK query
    Ask {
        /// SPARQL query string
        sparql: String,
    },

    /// Check that the store endpoint answers
    Ping,
}

/// Connections shared by every command.
pub struct Session {
    pub config: SyncConfig,
    pub client: SparqlClient,
}

impl Session {
    fn load(config_path: &std::path::Path) -> Result<Self> {
        let config = SyncConfig::load(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
        let client = SparqlClient::new(&config.store)?;
        Ok(Self { config, client })
    }

    pub fn repository(&self) -> RdfRepository {
        RdfRepository::from_config(Arc::new(self.client.clone()), &self.config)
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let session = Session::load(&self.config)?;

        match self.command {
            Commands::Sync(args) => sync::execute(args, &session).await,
            Commands::HasRevision { entity, revision } => sync::has_revision(&session, &entity, revision).await,
            Commands::Query { sparql } => query::select(&session, &sparql).await,
            Commands::Ask { sparql } => query::ask(&session, &sparql).await,
            Commands::Ping => query::ping(&session).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync() {
        let cli = Cli::try_parse_from(["triplesync", "sync", "Q42", "q42.json", "--dry-run"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("triplesync.toml"));
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.entity, "Q42");
                assert_eq!(args.file, PathBuf::from("q42.json"));
                assert!(args.dry_run);
            }
            _ => panic!("expected sync"),
        }
    }

    #[test]
    fn test_parse_has_revision_with_global_flags() {
        let cli = Cli::try_parse_from(["triplesync", "has-revision", "Q23", "10", "-v", "--config", "other.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(cli.command, Commands::HasRevision { revision: 10, .. }));
    }

    #[test]
    fn test_rejects_non_numeric_revision() {
        assert!(Cli::try_parse_from(["triplesync", "has-revision", "Q23", "ten"]).is_err());
    }
}
