//! Invoice Repository
//!
//! Local mirror of documents created on the invoicing provider.

use super::{RepoError, RepoResult};
use shared::models::{Invoice, InvoiceStatus};
use sqlx::SqlitePool;

/// Find invoices, optionally filtered by status
pub async fn find(pool: &SqlitePool, status: Option<InvoiceStatus>) -> RepoResult<Vec<Invoice>> {
    let rows = sqlx::query_as::<_, Invoice>(
        "SELECT * FROM invoice
         WHERE (?1 IS NULL OR status = ?1)
         ORDER BY issued_at DESC",
    )
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Find invoice by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Invoice>> {
    let row = sqlx::query_as::<_, Invoice>("SELECT * FROM invoice WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Find the invoice linked to an order, if any. At most one exists.
pub async fn find_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<Invoice>> {
    let row = sqlx::query_as::<_, Invoice>("SELECT * FROM invoice WHERE order_id = ?")
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Persist an invoice row built by the invoicing service
pub async fn create(pool: &SqlitePool, inv: &Invoice) -> RepoResult<Invoice> {
    sqlx::query(
        "INSERT INTO invoice
            (id, external_id, order_id, doc_type, doc_number, customer_name,
             issued_at, total, status, pdf_url, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(inv.id)
    .bind(&inv.external_id)
    .bind(inv.order_id)
    .bind(&inv.doc_type)
    .bind(&inv.doc_number)
    .bind(&inv.customer_name)
    .bind(inv.issued_at)
    .bind(inv.total)
    .bind(inv.status)
    .bind(&inv.pdf_url)
    .bind(inv.created_at)
    .execute(pool)
    .await?;

    find_by_id(pool, inv.id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create invoice".to_string()))
}

/// Persist a status change
pub async fn set_status(pool: &SqlitePool, id: i64, status: InvoiceStatus) -> RepoResult<Invoice> {
    let result = sqlx::query("UPDATE invoice SET status = ?1 WHERE id = ?2")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Invoice {} not found", id)));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Invoice {} not found", id)))
}

/// Store the provider's PDF URL once known
pub async fn set_pdf_url(pool: &SqlitePool, id: i64, pdf_url: &str) -> RepoResult<()> {
    sqlx::query("UPDATE invoice SET pdf_url = ?1 WHERE id = ?2")
        .bind(pdf_url)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
