//! Order API Handlers
//!
//! Creation and status changes go through the fulfillment workflow; the
//! response carries the side-effect results alongside the order.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{Order, OrderCreate, OrderStatus, OrderUpdate, OrderWithItems};

use crate::core::ServerState;
use crate::db::repository::order;
use crate::orders::{self, OrderOutcome};
use crate::utils::{AppError, AppResult};

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// GET /api/orders
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find(&state.pool, query.status, query.search, query.from, query.to).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderWithItems>> {
    let found = order::find_with_items(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(found))
}

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<OrderCreate>,
) -> AppResult<Json<OrderOutcome>> {
    let outcome = orders::create_order(&state, data).await?;
    Ok(Json(outcome))
}

/// PUT /api/orders/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<OrderUpdate>,
) -> AppResult<Json<OrderWithItems>> {
    let updated = orders::update_order(&state, id, data).await?;
    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
}

/// POST /api/orders/:id/status
pub async fn change_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(body): Json<StatusChange>,
) -> AppResult<Json<OrderOutcome>> {
    let outcome = orders::change_status(&state, id, body.status).await?;
    Ok(Json(outcome))
}
