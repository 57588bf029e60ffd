//! Offline catalog import
//!
//! Builds the SQLite catalog the daemon serves from a JSON array of outlets
//! (the same shape `GET /outlets` returns, optionally with an `id`).

use anyhow::{bail, Context, Result};
use outlet_common::Outlet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::store::OutletStore;

/// Parse an outlet file, dropping entries without a name or address
pub fn read_outlets(path: &Path) -> Result<Vec<Outlet>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let outlets: Vec<Outlet> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of outlets", path.display()))?;

    let total = outlets.len();
    let outlets: Vec<Outlet> = outlets
        .into_iter()
        .filter(|o| !o.name.trim().is_empty() && !o.address.trim().is_empty())
        .collect();

    if outlets.len() < total {
        warn!("Skipped {} outlets without name or address", total - outlets.len());
    }
    let unlocated = outlets.iter().filter(|o| o.position().is_none()).count();
    if unlocated > 0 {
        warn!("{} outlets have no valid coordinates and will not appear on the map", unlocated);
    }

    Ok(outlets)
}

/// Import `source` into the catalog at `db_path`, returning the row count
pub async fn run(source: &Path, db_path: &Path) -> Result<usize> {
    let outlets = read_outlets(source)?;
    if outlets.is_empty() {
        bail!("No outlets to import from {}", source.display());
    }

    let store = OutletStore::open_writable(db_path).await?;
    let inserted = store
        .insert_outlets(outlets)
        .await
        .context("Failed to insert outlets")?;

    info!("Imported {} outlets into {}", inserted, db_path.display());
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"name": "Subway Menara UOA Bangsar", "address": "Jalan Bangsar Utama 1",
         "operating_hours": "Monday - Friday, 7:00 AM - 8:00 PM",
         "waze_link": "https://waze.com/ul/hw283cg5x2", "latitude": 3.1281, "longitude": 101.6790},
        {"name": "Subway Sunway Pyramid", "address": "Bandar Sunway"},
        {"name": "", "address": "nowhere"}
    ]"#;

    #[test]
    fn test_read_outlets_filters_blank_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outlets.json");
        fs::write(&path, SAMPLE).unwrap();

        let outlets = read_outlets(&path).unwrap();
        assert_eq!(outlets.len(), 2);
        assert!(outlets[1].position().is_none());
    }

    #[tokio::test]
    async fn test_import_creates_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("outlets.json");
        let db = dir.path().join("outlets.db");
        fs::write(&source, SAMPLE).unwrap();

        assert_eq!(run(&source, &db).await.unwrap(), 2);

        let store = OutletStore::open_read_only(&db).await.unwrap();
        let outlets = store.all_outlets().await.unwrap();
        assert_eq!(outlets[0].name, "Subway Menara UOA Bangsar");
        assert_eq!(outlets[0].waze_link.as_deref(), Some("https://waze.com/ul/hw283cg5x2"));
    }

    #[tokio::test]
    async fn test_import_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("outlets.json");
        fs::write(&source, "[]").unwrap();

        assert!(run(&source, &dir.path().join("outlets.db")).await.is_err());
    }
}
