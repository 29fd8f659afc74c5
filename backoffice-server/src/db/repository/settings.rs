//! Settings Repository
//!
//! Singleton row (id = 1). Reads fall back to defaults when the row has
//! never been written.

use super::RepoResult;
use shared::models::{Settings, SettingsUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

/// Load settings, or the defaults when none have been saved yet
pub async fn get(pool: &SqlitePool) -> RepoResult<Settings> {
    let row = sqlx::query_as::<_, Settings>("SELECT * FROM settings WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.unwrap_or_default())
}

/// Merge the update into the current settings and upsert the singleton row
pub async fn update(pool: &SqlitePool, data: SettingsUpdate) -> RepoResult<Settings> {
    let current = get(pool).await?;

    let merged = Settings {
        id: 1,
        store_name: data.store_name.unwrap_or(current.store_name),
        store_phone: data.store_phone.or(current.store_phone),
        recipients: data.recipients.unwrap_or(current.recipients),
        stock_min_default: data.stock_min_default.unwrap_or(current.stock_min_default),
        sync_enabled: data.sync_enabled.unwrap_or(current.sync_enabled),
        sync_interval_minutes: data
            .sync_interval_minutes
            .unwrap_or(current.sync_interval_minutes),
        templates: data.templates.unwrap_or(current.templates),
        updated_at: now_millis(),
    };

    let recipients = serde_json::to_string(&merged.recipients)
        .map_err(|e| super::RepoError::Database(format!("Failed to encode recipients: {e}")))?;
    let templates = serde_json::to_string(&merged.templates)
        .map_err(|e| super::RepoError::Database(format!("Failed to encode templates: {e}")))?;

    sqlx::query(
        "INSERT INTO settings
            (id, store_name, store_phone, recipients, stock_min_default,
             sync_enabled, sync_interval_minutes, templates, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
            store_name = excluded.store_name,
            store_phone = excluded.store_phone,
            recipients = excluded.recipients,
            stock_min_default = excluded.stock_min_default,
            sync_enabled = excluded.sync_enabled,
            sync_interval_minutes = excluded.sync_interval_minutes,
            templates = excluded.templates,
            updated_at = excluded.updated_at",
    )
    .bind(&merged.store_name)
    .bind(&merged.store_phone)
    .bind(recipients)
    .bind(merged.stock_min_default)
    .bind(merged.sync_enabled)
    .bind(merged.sync_interval_minutes)
    .bind(templates)
    .bind(merged.updated_at)
    .execute(pool)
    .await?;

    Ok(merged)
}
