//! Terminal sync client for the todo record store.
//!
//! Stdout is the view; all tracing output goes to stderr.

use clap::Parser;
use std::path::PathBuf;
use todosync::client::{SyncApp, TerminalView, TodoClient};
use todosync::TodoConfig;
use tracing_subscriber::EnvFilter;

/// Show and edit the todo list held by a record store.
#[derive(Parser)]
#[command(name = "todosync-client", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Record store base URL (overrides config).
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("todosync=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = TodoConfig::load(cli.config.as_deref())?;
    let base_url = cli.base_url.unwrap_or(config.client.base_url);

    let mut app = SyncApp::new(TodoClient::new(base_url), TerminalView::stdio());
    app.run().await.map_err(|e| {
        tracing::error!(error = %e, "todosync-client exited with error");
        anyhow::anyhow!("todosync-client failed: {e}")
    })?;

    Ok(())
}
