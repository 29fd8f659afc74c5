//! Sync API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use shared::models::SyncLog;

use crate::catalog::{self, SyncReport};
use crate::core::ServerState;
use crate::db::repository::sync_log;
use crate::utils::AppResult;

/// POST /api/sync/catalog
///
/// Full pull + reconcile against the remote catalog, on demand.
pub async fn run_catalog_sync(State(state): State<ServerState>) -> AppResult<Json<SyncReport>> {
    let report = catalog::run_full_sync(&state).await?;
    Ok(Json(report))
}

#[derive(Deserialize)]
pub struct LogQuery {
    pub limit: Option<i64>,
}

/// GET /api/sync/log
pub async fn recent_log(
    State(state): State<ServerState>,
    Query(query): Query<LogQuery>,
) -> AppResult<Json<Vec<SyncLog>>> {
    let entries = sync_log::recent(&state.pool, query.limit.unwrap_or(100)).await?;
    Ok(Json(entries))
}
