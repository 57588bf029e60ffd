//! HTTP server for outletd

use crate::routes;
use crate::store::OutletStore;
use crate::translator::SqlTranslator;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub store: OutletStore,
    pub translator: SqlTranslator,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: OutletStore, translator: SqlTranslator) -> Self {
        Self {
            store,
            translator,
            start_time: Instant::now(),
        }
    }
}

/// Assemble every route over shared state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::outlet_routes())
        .merge(routes::query_routes())
        .merge(routes::health_routes())
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until interrupted
pub async fn run(state: AppState, addr: &str) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down gracefully");
        })
        .await?;
    Ok(())
}
