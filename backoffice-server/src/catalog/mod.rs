//! Catalog Integration
//!
//! Keeps the local product table roughly in sync with the external
//! e-commerce catalog. All operations are best-effort: failures land in
//! sync_log and never abort the caller.

pub mod client;
pub mod images;
pub mod sync;

pub use client::{CatalogClient, CatalogError, RemoteProduct};
pub use sync::{SyncReport, push_delete, push_one, run_full_sync, spawn_periodic_sync};
