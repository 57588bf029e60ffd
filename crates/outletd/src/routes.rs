//! API routes for outletd
//!
//! `GET /outlets` lists the catalog, `POST /query` answers a natural-language
//! question through the SQL translator, `GET /health` reports liveness.

use crate::error::ApiError;
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use outlet_common::{HealthResponse, Outlet, QueryRequest, QueryResponse};
use std::sync::Arc;
use tracing::{error, info};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Outlet Routes
// ============================================================================

pub fn outlet_routes() -> Router<AppStateArc> {
    Router::new().route("/outlets", get(list_outlets))
}

async fn list_outlets(State(state): State<AppStateArc>) -> Result<Json<Vec<Outlet>>, ApiError> {
    info!("  Listing outlets");

    let outlets = state.store.all_outlets().await.map_err(|e| {
        error!("  Outlet listing failed: {}", e);
        ApiError::from(e)
    })?;

    if outlets.is_empty() {
        return Err(ApiError::NotFound("No outlets found".to_string()));
    }

    Ok(Json(outlets))
}

// ============================================================================
// Query Routes
// ============================================================================

pub fn query_routes() -> Router<AppStateArc> {
    Router::new().route("/query", post(query_outlets))
}

async fn query_outlets(
    State(state): State<AppStateArc>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    info!("  Question: {}", req.question);

    let translation = state.translator.answer(&req.question).await.map_err(|e| {
        error!("  Query failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(QueryResponse {
        query: req.question,
        results: translation.answer,
    }))
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Result<Json<HealthResponse>, ApiError> {
    let outlets = state.store.count().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        outlets,
    }))
}
