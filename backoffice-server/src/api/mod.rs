//! API route modules
//!
//! One module per resource, each exposing a `router()` nested under its
//! own `/api/...` prefix:
//!
//! - [`health`] - liveness and detailed health checks
//! - [`employees`] - employee management
//! - [`clockings`] - clock in/out events
//! - [`incidents`] - incident tracking and comments
//! - [`products`] - products, stock and catalog push
//! - [`orders`] - custom orders and status transitions
//! - [`invoices`] - invoice mirror and PDF download
//! - [`settings`] - the settings singleton
//! - [`sync`] - full catalog sync and the sync audit log

pub mod clockings;
pub mod employees;
pub mod health;
pub mod incidents;
pub mod invoices;
pub mod orders;
pub mod products;
pub mod settings;
pub mod sync;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Full application router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(employees::router())
        .merge(clockings::router())
        .merge(incidents::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(invoices::router())
        .merge(settings::router())
        .merge(sync::router())
}
