//! Outlet Daemon - outlet catalog and question answering API
//!
//! Serves the read-only outlet catalog over HTTP and answers natural-language
//! questions about it through an LLM-backed SQL translator.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use outletd::config::Config;
use outletd::llm_client::HttpLlmClient;
use outletd::store::OutletStore;
use outletd::translator::SqlTranslator;
use outletd::{import, server, AppState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "outletd")]
#[command(about = "Outlet directory daemon", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to /etc/outletd/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API (default)
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },

    /// Build the catalog from a JSON array of outlets
    Import {
        /// JSON file to import
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => serve(config, bind).await,
        Commands::Import { file } => {
            import::run(&file, Path::new(&config.database.path)).await?;
            Ok(())
        }
    }
}

async fn serve(config: Config, bind: Option<String>) -> Result<()> {
    info!("Outlet Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let api_key = config.api_key()?;

    let store = OutletStore::open_read_only(Path::new(&config.database.path))
        .await
        .with_context(|| format!("Failed to open outlet catalog {}", config.database.path))?;
    info!("  Catalog holds {} outlets", store.count().await?);

    let llm = HttpLlmClient::new(config.llm.clone(), api_key)?;
    info!("  Translator model: {}", config.llm.model);

    let translator = SqlTranslator::new(
        Arc::new(llm),
        store.clone(),
        config.llm.top_k,
        config.llm.sample_rows,
    );

    let addr = bind.unwrap_or(config.server.bind);
    server::run(AppState::new(store, translator), &addr).await
}
