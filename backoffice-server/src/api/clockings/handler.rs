//! Clocking API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{Clocking, ClockingCreate, ClockingUpdate};

use crate::core::ServerState;
use crate::db::repository::clocking;
use crate::utils::{AppError, AppResult};

#[derive(Deserialize)]
pub struct ListQuery {
    pub employee_id: Option<i64>,
    /// Range start, unix millis inclusive
    pub from: Option<i64>,
    /// Range end, unix millis inclusive
    pub to: Option<i64>,
}

/// GET /api/clockings
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Clocking>>> {
    let clockings = clocking::find(&state.pool, query.employee_id, query.from, query.to).await?;
    Ok(Json(clockings))
}

/// GET /api/clockings/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Clocking>> {
    let found = clocking::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Clocking {}", id)))?;
    Ok(Json(found))
}

/// POST /api/clockings
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<ClockingCreate>,
) -> AppResult<Json<Clocking>> {
    let created = clocking::create(&state.pool, data).await?;
    Ok(Json(created))
}

/// PUT /api/clockings/:id (admin correction)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<ClockingUpdate>,
) -> AppResult<Json<Clocking>> {
    let updated = clocking::update(&state.pool, id, data).await?;
    Ok(Json(updated))
}

/// DELETE /api/clockings/:id (admin correction)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = clocking::delete(&state.pool, id).await?;
    Ok(Json(deleted))
}
