//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};

use crate::core::ServerState;
use crate::db::repository::employee;
use crate::utils::AppResult;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// GET /api/employees
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Employee>>> {
    let employees = if query.include_inactive {
        employee::find_all_with_inactive(&state.pool).await?
    } else {
        employee::find_all(&state.pool).await?
    };
    Ok(Json(employees))
}

/// GET /api/employees/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Employee>> {
    let found = employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| crate::utils::AppError::not_found(format!("Employee {}", id)))?;
    Ok(Json(found))
}

/// POST /api/employees
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<EmployeeCreate>,
) -> AppResult<Json<Employee>> {
    let created = employee::create(&state.pool, data).await?;
    Ok(Json(created))
}

/// PUT /api/employees/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    let updated = employee::update(&state.pool, id, data).await?;
    Ok(Json(updated))
}

/// DELETE /api/employees/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = employee::delete(&state.pool, id).await?;
    Ok(Json(deleted))
}
