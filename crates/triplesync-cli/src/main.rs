//! triplesync CLI
//!
//! Pushes entity descriptions into a SPARQL triple store.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Cli;

/// Initialize tracing, optionally mirroring events to a log file.
///
/// The returned guard flushes the file writer on drop and must live until exit.
fn init_tracing(
    log_file: Option<&std::path::Path>,
    verbose: bool,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_filter = if verbose {
        "triplesync=debug,triplesync_sync=debug,triplesync_store=debug"
    } else {
        "triplesync=info,triplesync_sync=info"
    };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so query results on stdout stay pipeable
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            if let Some(dir) = dir {
                let _ = std::fs::create_dir_all(dir);
            }
            let file_name = path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("triplesync.log"));
            let appender = tracing_appender::rolling::never(dir.unwrap_or_else(|| std::path::Path::new(".")), file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr)
                .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(env_filter).with(stderr).init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref(), cli.verbose);

    cli.execute().await
}
