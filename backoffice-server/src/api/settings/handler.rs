//! Settings API Handlers

use axum::{Json, extract::State};

use shared::models::{Settings, SettingsUpdate};

use crate::core::ServerState;
use crate::db::repository::settings;
use crate::utils::AppResult;

/// GET /api/settings
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<Settings>> {
    let current = settings::get(&state.pool).await?;
    Ok(Json(current))
}

/// PUT /api/settings
pub async fn update(
    State(state): State<ServerState>,
    Json(data): Json<SettingsUpdate>,
) -> AppResult<Json<Settings>> {
    let updated = settings::update(&state.pool, data).await?;
    Ok(Json(updated))
}
