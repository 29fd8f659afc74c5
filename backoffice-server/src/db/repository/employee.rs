//! Employee Repository

use super::{RepoError, RepoResult};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Find all active employees
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let rows = sqlx::query_as::<_, Employee>(
        "SELECT * FROM employee WHERE is_active = 1 ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Find all employees including inactive
pub async fn find_all_with_inactive(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let rows = sqlx::query_as::<_, Employee>("SELECT * FROM employee ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Find employee by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let row = sqlx::query_as::<_, Employee>("SELECT * FROM employee WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a new employee
pub async fn create(pool: &SqlitePool, data: EmployeeCreate) -> RepoResult<Employee> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO employee (id, name, email, phone, role, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(data.role)
    .bind(now_millis())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".to_string()))
}

/// Update an employee (None fields keep their current value)
pub async fn update(pool: &SqlitePool, id: i64, data: EmployeeUpdate) -> RepoResult<Employee> {
    let result = sqlx::query(
        "UPDATE employee SET
            name = COALESCE(?1, name),
            email = COALESCE(?2, email),
            phone = COALESCE(?3, phone),
            role = COALESCE(?4, role),
            is_active = COALESCE(?5, is_active)
         WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(data.role)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {} not found", id)));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))
}

/// Hard delete an employee
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {} not found", id)));
    }
    Ok(true)
}
