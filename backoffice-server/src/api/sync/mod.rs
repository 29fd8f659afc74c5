//! Sync API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/sync",
        Router::new()
            .route("/catalog", post(handler::run_catalog_sync))
            .route("/log", get(handler::recent_log)),
    )
}
