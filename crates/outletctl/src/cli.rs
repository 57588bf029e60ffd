//! CLI - Command-line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Outlet directory client
#[derive(Parser)]
#[command(name = "outletctl")]
#[command(about = "Outlet directory - map, overlaps and chat", long_about = None)]
#[command(version)]
pub struct Cli {
    /// outletd base URL (overrides the config file)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Config file (defaults to $XDG_CONFIG_HOME/outletctl/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand (if not provided, starts the chat REPL)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every outlet
    Outlets {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Show outlets whose 5 km service areas overlap
    Overlaps,

    /// Render the outlet map
    Map {
        /// Output file (defaults to the configured map output)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Write GeoJSON instead of a Leaflet page
        #[arg(long)]
        geojson: bool,
    },

    /// Ask a single question
    Ask {
        /// The question, in plain language
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Start the chat REPL
    Chat,
}
