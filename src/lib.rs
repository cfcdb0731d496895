//! WalletSense dashboard core
//!
//! Loads an uploaded MCP record set (assets, liabilities, goals,
//! transactions), derives every dashboard panel from it, and talks to the AI
//! backend for chat answers, categorization and summaries.
//!
//! FLOW:
//! UPLOAD → VALIDATE → REPLACE SNAPSHOT → AGGREGATE → RENDER / EXPORT

pub mod aggregate;
pub mod api;
pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod models;
pub mod sequence;
pub mod state;
pub mod views;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use state::AppState;
