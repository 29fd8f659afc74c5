//! Incident Model

use serde::{Deserialize, Serialize};

/// Incident priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum IncidentPriority {
    Low,
    Medium,
    High,
}

/// Incident status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum IncidentStatus {
    Open,
    InProgress,
    Resolved,
}

/// A comment on an incident (stored as a JSON array on the incident row)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentComment {
    pub author_id: i64,
    pub body: String,
    pub created_at: i64,
}

/// Incident entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Incident {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: IncidentPriority,
    pub status: IncidentStatus,
    pub created_by: i64,
    pub assignee: Option<i64>,
    /// Stamped when status transitions to resolved
    pub resolved_at: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub comments: Vec<IncidentComment>,
    pub created_at: i64,
}

/// Create incident payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentCreate {
    pub title: String,
    pub description: String,
    pub priority: IncidentPriority,
    pub created_by: i64,
    pub assignee: Option<i64>,
}

/// Update incident payload (status/priority/assignee)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentUpdate {
    pub status: Option<IncidentStatus>,
    pub priority: Option<IncidentPriority>,
    pub assignee: Option<i64>,
}

/// Append a comment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentCommentCreate {
    pub author_id: i64,
    pub body: String,
}
