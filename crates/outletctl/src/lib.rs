//! Outlet control library - exposes modules for testing.

pub mod cache;
pub mod chat;
pub mod cli;
pub mod client;
pub mod config;
pub mod display;
pub mod map;
pub mod repl;
pub mod testing;
