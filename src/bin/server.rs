//! Record store HTTP server.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use todosync::server::serve_until_shutdown;
use todosync::{TodoConfig, TodoStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serve the todo record store over HTTP.
#[derive(Parser)]
#[command(name = "todosync-server", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Bind port (overrides config).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("todosync=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = TodoConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.db_path {
        config.store.db_path = path;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let store = Arc::new(TodoStore::open(&config.store.db_path)?);

    serve_until_shutdown(store, &config.server, async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down..."),
            Err(e) => tracing::error!(error = %e, "failed to listen for Ctrl+C; shutting down"),
        }
    })
    .await?;

    Ok(())
}
