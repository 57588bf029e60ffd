//! Session cache for the outlet list.
//!
//! The list is fetched on first use and kept for the rest of the session.
//! Nothing refreshes it automatically; `invalidate` forces the next access
//! to fetch again. Failed fetches are not cached.

use outlet_common::Outlet;
use tracing::info;

use crate::client::{CatalogApi, ClientError};

#[derive(Debug, Default)]
pub struct OutletCache {
    outlets: Option<Vec<Outlet>>,
}

impl OutletCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&mut self, api: &dyn CatalogApi) -> Result<&[Outlet], ClientError> {
        if self.outlets.is_none() {
            let fetched = api.fetch_outlets().await?;
            info!("Fetched {} outlets", fetched.len());
            self.outlets = Some(fetched);
        }
        Ok(self.outlets.as_deref().unwrap_or(&[]))
    }

    pub fn invalidate(&mut self) {
        self.outlets = None;
    }

    pub fn is_cached(&self) -> bool {
        self.outlets.is_some()
    }
}
