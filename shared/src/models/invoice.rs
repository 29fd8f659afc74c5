//! Invoice Model
//!
//! Local mirror of documents created on the external invoicing platform.
//! Status mirrors the remote state with lag; sync_log is the audit trail when
//! the two diverge.

use serde::{Deserialize, Serialize};

/// Invoice status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum InvoiceStatus {
    Issued,
    Paid,
    Cancelled,
}

/// Invoice entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i64,
    /// Document ID on the external invoicing platform
    pub external_id: Option<String>,
    pub order_id: Option<i64>,
    pub doc_type: String,
    pub doc_number: String,
    /// Customer name snapshot at issue time
    pub customer_name: String,
    /// Issue date (unix millis)
    pub issued_at: i64,
    pub total: f64,
    pub status: InvoiceStatus,
    pub pdf_url: Option<String>,
    pub created_at: i64,
}
