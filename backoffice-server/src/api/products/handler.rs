//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::catalog;
use crate::core::ServerState;
use crate::db::repository::{product, settings};
use crate::utils::{AppError, AppResult};

#[derive(Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

/// GET /api/products
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product::find(
        &state.pool,
        query.category,
        query.search,
        query.include_inactive,
    )
    .await?;
    Ok(Json(products))
}

/// GET /api/products/low-stock
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_low_stock(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let found = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(Json(found))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    let stock_min_default = settings::get(&state.pool).await?.stock_min_default;
    let created = product::create(&state.pool, data, stock_min_default).await?;
    Ok(Json(created))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let updated = product::update(&state.pool, id, data).await?;
    Ok(Json(updated))
}

/// DELETE /api/products/:id
///
/// Deactivates locally (order lines keep referencing the row) and removes
/// the remote counterpart best-effort.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let found = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;

    product::deactivate(&state.pool, id).await?;

    if let Some(external_id) = found.external_id {
        if let Err(e) = catalog::push_delete(&state, id, external_id).await {
            tracing::warn!(product_id = id, "Remote delete failed: {}", e);
        }
    }
    Ok(Json(true))
}

/// POST /api/products/:id/push
pub async fn push(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let pushed = catalog::push_one(&state, id).await?;
    Ok(Json(pushed))
}
