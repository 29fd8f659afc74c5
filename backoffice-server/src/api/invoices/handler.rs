//! Invoice API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;

use shared::models::{Invoice, InvoiceStatus};

use crate::core::ServerState;
use crate::db::repository::invoice;
use crate::invoicing;
use crate::utils::{AppError, AppResult};

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<InvoiceStatus>,
}

/// GET /api/invoices
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Invoice>>> {
    let invoices = invoice::find(&state.pool, query.status).await?;
    Ok(Json(invoices))
}

/// GET /api/invoices/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Invoice>> {
    let found = invoice::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {}", id)))?;
    Ok(Json(found))
}

/// GET /api/invoices/:id/pdf
///
/// Streams the rendered document. A document not yet renderable upstream
/// comes back as a 502 the client may retry.
pub async fn download_pdf(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let found = invoice::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {}", id)))?;

    let bytes = invoicing::fetch_pdf(&state, &found).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.pdf\"", found.doc_number),
            ),
        ],
        bytes,
    ))
}

#[derive(Deserialize)]
pub struct StatusChange {
    pub status: InvoiceStatus,
}

/// POST /api/invoices/:id/status
///
/// Marking paid settles the remote document too; cancellation is local
/// bookkeeping only.
pub async fn change_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(body): Json<StatusChange>,
) -> AppResult<Json<Invoice>> {
    let found = invoice::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {}", id)))?;

    let updated = match body.status {
        InvoiceStatus::Paid if found.status == InvoiceStatus::Issued => {
            invoicing::mark_paid(&state, &found).await?
        }
        status if status == found.status => found,
        status => invoice::set_status(&state.pool, id, status).await?,
    };
    Ok(Json(updated))
}
