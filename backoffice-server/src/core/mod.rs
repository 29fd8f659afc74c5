//! Core Module
//!
//! Configuration, shared server state and the HTTP server.

pub mod config;
pub mod server;
pub mod state;

pub use config::{CatalogConfig, Config, InvoicingConfig, MessagingConfig};
pub use server::Server;
pub use state::ServerState;
