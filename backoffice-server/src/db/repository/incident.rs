//! Incident Repository

use super::{RepoError, RepoResult};
use shared::models::{
    Incident, IncidentComment, IncidentCommentCreate, IncidentCreate, IncidentStatus,
    IncidentUpdate,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Find incidents, optionally filtered by status and a title/description
/// search term
pub async fn find(
    pool: &SqlitePool,
    status: Option<IncidentStatus>,
    search: Option<String>,
) -> RepoResult<Vec<Incident>> {
    let pattern = search.map(|s| format!("%{}%", s));
    let rows = sqlx::query_as::<_, Incident>(
        "SELECT * FROM incident
         WHERE (?1 IS NULL OR status = ?1)
           AND (?2 IS NULL OR title LIKE ?2 OR description LIKE ?2)
         ORDER BY created_at DESC",
    )
    .bind(status)
    .bind(pattern)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Find incident by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Incident>> {
    let row = sqlx::query_as::<_, Incident>("SELECT * FROM incident WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a new incident (status starts open, comments empty)
pub async fn create(pool: &SqlitePool, data: IncidentCreate) -> RepoResult<Incident> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO incident (id, title, description, priority, status, created_by, assignee, comments, created_at)
         VALUES (?1, ?2, ?3, ?4, 'open', ?5, ?6, '[]', ?7)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.priority)
    .bind(data.created_by)
    .bind(data.assignee)
    .bind(now_millis())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create incident".to_string()))
}

/// Update status, priority or assignee. Moving to resolved stamps
/// resolved_at; moving away clears it.
pub async fn update(pool: &SqlitePool, id: i64, data: IncidentUpdate) -> RepoResult<Incident> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Incident {} not found", id)))?;

    let resolved_at = match data.status {
        Some(IncidentStatus::Resolved) => current.resolved_at.or_else(|| Some(now_millis())),
        Some(_) => None,
        None => current.resolved_at,
    };

    sqlx::query(
        "UPDATE incident SET
            status = COALESCE(?1, status),
            priority = COALESCE(?2, priority),
            assignee = COALESCE(?3, assignee),
            resolved_at = ?4
         WHERE id = ?5",
    )
    .bind(data.status)
    .bind(data.priority)
    .bind(data.assignee)
    .bind(resolved_at)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Incident {} not found", id)))
}

/// Append a comment to the incident's comment list
pub async fn add_comment(
    pool: &SqlitePool,
    id: i64,
    data: IncidentCommentCreate,
) -> RepoResult<Incident> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Incident {} not found", id)))?;

    let mut comments = current.comments;
    comments.push(IncidentComment {
        author_id: data.author_id,
        body: data.body,
        created_at: now_millis(),
    });
    let json = serde_json::to_string(&comments)
        .map_err(|e| RepoError::Database(format!("Failed to encode comments: {e}")))?;

    sqlx::query("UPDATE incident SET comments = ?1 WHERE id = ?2")
        .bind(json)
        .bind(id)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Incident {} not found", id)))
}

/// Delete an incident
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM incident WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Incident {} not found", id)));
    }
    Ok(true)
}
