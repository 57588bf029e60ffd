//! Outlet Control - CLI client for the outlet directory
//!
//! Fetches outlets from outletd, reports overlapping service areas, renders
//! the map and chats with the catalog.

use anyhow::Result;
use clap::Parser;
use outlet_common::Conversation;
use outletctl::cache::OutletCache;
use outletctl::chat::chat_turn;
use outletctl::cli::{Cli, Commands};
use outletctl::client::CatalogClient;
use outletctl::config::ClientConfig;
use outletctl::{display, map, repl};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref())?;
    let server = cli.server.unwrap_or(config.client.server_url.clone());
    let client = CatalogClient::new(&server);

    let mut cache = OutletCache::new();

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Outlets { json } => {
            let outlets = cache.get(&client).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(outlets)?);
            } else {
                display::print_outlets(outlets);
            }
        }

        Commands::Overlaps => {
            let outlets = cache.get(&client).await?;
            display::print_overlaps(outlets);
        }

        Commands::Map { out, geojson } => {
            let outlets = cache.get(&client).await?;
            let layers = map::build_layers(outlets, config.map.zoom);

            let (content, default_out) = if geojson {
                (
                    serde_json::to_string_pretty(&map::render_geojson(&layers))?,
                    PathBuf::from(&config.map.output).with_extension("geojson"),
                )
            } else {
                (map::render_html(&layers, &config.map)?, PathBuf::from(&config.map.output))
            };

            let path = out.unwrap_or(default_out);
            fs::write(&path, content)?;
            println!(
                "Map written to {} ({} outlets, {} overlap areas)",
                path.display(),
                layers.markers.len(),
                layers.overlap_areas.len()
            );
        }

        Commands::Ask { question } => {
            let mut conversation = Conversation::new();
            let reply = chat_turn(&mut conversation, &client, &question.join(" ")).await;
            println!("{}", reply);
        }

        Commands::Chat => repl::run_repl(&client, &config.map).await?,
    }

    Ok(())
}
