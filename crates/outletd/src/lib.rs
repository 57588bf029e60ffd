//! Outlet daemon library - exposes modules for testing.

pub mod config;
pub mod error;
pub mod import;
pub mod llm_client;
pub mod routes;
pub mod server;
pub mod store;
pub mod translator;

pub use server::{build_router, AppState};
