//! Sync Log Repository
//!
//! Append-only audit of integration calls.

use super::RepoResult;
use shared::models::{SyncLog, SyncLogCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Append an entry. Logging must never break the caller, so integration
/// code wraps this in a best-effort helper.
pub async fn append(pool: &SqlitePool, data: SyncLogCreate) -> RepoResult<SyncLog> {
    let id = snowflake_id();
    let created_at = now_millis();
    let details = match &data.details {
        Some(v) => Some(
            serde_json::to_string(v)
                .map_err(|e| super::RepoError::Database(format!("Failed to encode details: {e}")))?,
        ),
        None => None,
    };

    sqlx::query(
        "INSERT INTO sync_log (id, source, action, success, message, details, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(&data.source)
    .bind(&data.action)
    .bind(data.success)
    .bind(&data.message)
    .bind(details)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(SyncLog {
        id,
        source: data.source,
        action: data.action,
        success: data.success,
        message: data.message,
        details: data.details,
        created_at,
    })
}

/// Best-effort append used by the adapters. A failed audit write is logged
/// and swallowed so it can never break the operation being audited.
pub async fn record(
    pool: &SqlitePool,
    source: &str,
    action: &str,
    success: bool,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) {
    let entry = SyncLogCreate {
        source: source.to_string(),
        action: action.to_string(),
        success,
        message: message.into(),
        details,
    };
    if let Err(e) = append(pool, entry).await {
        tracing::warn!(source, action, "Failed to write sync log entry: {}", e);
    }
}

/// Most recent entries, newest first
pub async fn recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<SyncLog>> {
    let rows = sqlx::query_as::<_, SyncLog>(
        "SELECT * FROM sync_log ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
