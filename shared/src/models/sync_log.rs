//! Sync Log Model
//!
//! Append-only audit record for every integration call. The only trail for
//! manual reconciliation after a partial failure.

use serde::{Deserialize, Serialize};

/// Sync log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SyncLog {
    pub id: i64,
    /// Integration name ("catalog", "messaging", "invoicing")
    pub source: String,
    pub action: String,
    pub success: bool,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub created_at: i64,
}

/// Append payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncLogCreate {
    pub source: String,
    pub action: String,
    pub success: bool,
    pub message: String,
    pub details: Option<serde_json::Value>,
}
