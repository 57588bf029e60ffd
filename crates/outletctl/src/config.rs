//! Client configuration
//!
//! Read from `--config`, else `$XDG_CONFIG_HOME/outletctl/config.toml` when
//! present, else defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSection {
    /// Base URL of outletd
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Marker image, used as-is without checking it exists
    #[serde(default = "default_marker_icon")]
    pub marker_icon: String,

    #[serde(default = "default_icon_width")]
    pub icon_width: u32,

    #[serde(default = "default_icon_height")]
    pub icon_height: u32,

    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Where `outletctl map` writes by default
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_marker_icon() -> String {
    "subway-marker.png".to_string()
}

fn default_icon_width() -> u32 {
    20
}

fn default_icon_height() -> u32 {
    30
}

fn default_zoom() -> u8 {
    11
}

fn default_output() -> String {
    "outlets-map.html".to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            marker_icon: default_marker_icon(),
            icon_width: default_icon_width(),
            icon_height: default_icon_height(),
            zoom: default_zoom(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub client: ClientSection,

    #[serde(default)]
    pub map: MapConfig,
}

impl ClientConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        match default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("outletctl").join("config.toml"))
}
