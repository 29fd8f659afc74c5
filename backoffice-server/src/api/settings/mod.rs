//! Settings API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/settings",
        Router::new().route("/", get(handler::get).put(handler::update)),
    )
}
