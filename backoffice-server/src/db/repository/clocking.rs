//! Clocking Repository
//!
//! Append-only except for admin corrections.

use super::{RepoError, RepoResult};
use shared::models::{Clocking, ClockingCreate, ClockingUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Find clockings, optionally filtered by employee and date range
pub async fn find(
    pool: &SqlitePool,
    employee_id: Option<i64>,
    from: Option<i64>,
    to: Option<i64>,
) -> RepoResult<Vec<Clocking>> {
    let rows = sqlx::query_as::<_, Clocking>(
        "SELECT * FROM clocking
         WHERE (?1 IS NULL OR employee_id = ?1)
           AND (?2 IS NULL OR clocked_at >= ?2)
           AND (?3 IS NULL OR clocked_at <= ?3)
         ORDER BY clocked_at DESC",
    )
    .bind(employee_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Find clocking by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Clocking>> {
    let row = sqlx::query_as::<_, Clocking>("SELECT * FROM clocking WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Append a clock event. In/out alternation within a day is not checked.
pub async fn create(pool: &SqlitePool, data: ClockingCreate) -> RepoResult<Clocking> {
    let id = snowflake_id();
    let clocked_at = data.clocked_at.unwrap_or_else(now_millis);
    sqlx::query("INSERT INTO clocking (id, employee_id, kind, clocked_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(id)
        .bind(data.employee_id)
        .bind(data.kind)
        .bind(clocked_at)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create clocking".to_string()))
}

/// Admin correction of an existing event
pub async fn update(pool: &SqlitePool, id: i64, data: ClockingUpdate) -> RepoResult<Clocking> {
    let result = sqlx::query(
        "UPDATE clocking SET
            kind = COALESCE(?1, kind),
            clocked_at = COALESCE(?2, clocked_at)
         WHERE id = ?3",
    )
    .bind(data.kind)
    .bind(data.clocked_at)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Clocking {} not found", id)));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Clocking {} not found", id)))
}

/// Admin deletion of an event
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM clocking WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Clocking {} not found", id)));
    }
    Ok(true)
}
