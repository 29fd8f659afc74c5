//! Incident API Handlers
//!
//! High-priority creation or escalation notifies the recipient list,
//! best-effort.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{
    Incident, IncidentCommentCreate, IncidentCreate, IncidentPriority, IncidentStatus,
    IncidentUpdate,
};

use crate::core::ServerState;
use crate::db::repository::incident;
use crate::notify;
use crate::utils::{AppError, AppResult};

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<IncidentStatus>,
    pub search: Option<String>,
}

/// GET /api/incidents
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Incident>>> {
    let incidents = incident::find(&state.pool, query.status, query.search).await?;
    Ok(Json(incidents))
}

/// GET /api/incidents/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Incident>> {
    let found = incident::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Incident {}", id)))?;
    Ok(Json(found))
}

/// POST /api/incidents
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<IncidentCreate>,
) -> AppResult<Json<Incident>> {
    let high_priority = data.priority == IncidentPriority::High;
    let created = incident::create(&state.pool, data).await?;

    if high_priority {
        notify_high_priority(&state, &created).await;
    }
    Ok(Json(created))
}

/// PUT /api/incidents/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<IncidentUpdate>,
) -> AppResult<Json<Incident>> {
    let before = incident::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Incident {}", id)))?;

    let updated = incident::update(&state.pool, id, data).await?;

    // Escalation to high fires the same alert as a high-priority create
    if before.priority != IncidentPriority::High && updated.priority == IncidentPriority::High {
        notify_high_priority(&state, &updated).await;
    }
    Ok(Json(updated))
}

/// POST /api/incidents/:id/comments
pub async fn add_comment(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<IncidentCommentCreate>,
) -> AppResult<Json<Incident>> {
    let updated = incident::add_comment(&state.pool, id, data).await?;
    Ok(Json(updated))
}

/// DELETE /api/incidents/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = incident::delete(&state.pool, id).await?;
    Ok(Json(deleted))
}

async fn notify_high_priority(state: &ServerState, inc: &Incident) {
    let outcome = notify::notify_template(
        state,
        "message",
        &[(
            "message",
            format!("Incidencia urgente: {} ({})", inc.title, inc.id),
        )],
    )
    .await;
    if !outcome.success {
        tracing::warn!(incident_id = inc.id, "High-priority incident alert not delivered");
    }
}
