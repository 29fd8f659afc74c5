//! Clocking Model
//!
//! Append-only in/out events. Admin corrections (edit/delete) are the only
//! mutations. In/out alternation within a day is not enforced.

use serde::{Deserialize, Serialize};

/// Clock event kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ClockKind {
    In,
    Out,
}

/// Clocking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Clocking {
    pub id: i64,
    pub employee_id: i64,
    pub kind: ClockKind,
    /// Event timestamp (unix millis)
    pub clocked_at: i64,
}

/// Create clocking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockingCreate {
    pub employee_id: i64,
    pub kind: ClockKind,
    /// Defaults to now when omitted
    pub clocked_at: Option<i64>,
}

/// Admin correction payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockingUpdate {
    pub kind: Option<ClockKind>,
    pub clocked_at: Option<i64>,
}
