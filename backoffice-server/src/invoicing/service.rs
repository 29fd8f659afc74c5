//! Invoicing Service
//!
//! Builds documents from the stored order lines (never from request
//! payloads, which may carry stale prices), mirrors the result into the
//! local invoice table and keeps the sync_log trail.

use shared::models::{Invoice, InvoiceStatus, Order, OrderItem};
use shared::util::{now_millis, snowflake_id};

use crate::core::ServerState;
use crate::db::repository::{invoice, sync_log};
use crate::invoicing::client::{DocumentItem, DocumentRequest, InvoiceError};
use crate::orders::money;

/// Validate the stored lines before any remote call. The error names the
/// first offending line index and field.
fn validate_lines(items: &[OrderItem]) -> Result<(), InvoiceError> {
    for (index, item) in items.iter().enumerate() {
        if item.quantity <= 0 {
            return Err(InvoiceError::InvalidLine {
                index,
                field: "quantity",
            });
        }
        if item.unit_price <= 0.0 {
            return Err(InvoiceError::InvalidLine {
                index,
                field: "unit_price",
            });
        }
    }
    Ok(())
}

/// Create an invoice document for an order. `status` is the initial local
/// status (issued on ready, paid on delivered); the remote pay call is the
/// caller's responsibility.
pub async fn create_from_order(
    state: &ServerState,
    order: &Order,
    items: &[OrderItem],
    status: InvoiceStatus,
) -> Result<Invoice, InvoiceError> {
    validate_lines(items)?;

    let total = money::lines_total(items.iter().map(|i| (i.quantity, i.unit_price)));
    let request = DocumentRequest {
        contact_name: order.customer_name.clone(),
        date: now_millis() / 1000,
        items: items
            .iter()
            .map(|i| DocumentItem {
                name: i.product_name.clone(),
                quantity: i.quantity,
                unit_price: i.unit_price,
                tax: 0.0,
            })
            .collect(),
        invoice_num: order.order_number.clone(),
        approve_doc: true,
    };

    let response = match state.invoicing.create_document(&request).await {
        Ok(r) => r,
        Err(e) => {
            sync_log::record(
                &state.pool,
                "invoicing",
                "create",
                false,
                e.to_string(),
                Some(serde_json::json!({ "order_id": order.id })),
            )
            .await;
            return Err(e);
        }
    };

    let row = Invoice {
        id: snowflake_id(),
        external_id: Some(response.id.clone()),
        order_id: Some(order.id),
        doc_type: "invoice".to_string(),
        doc_number: response.invoice_num.unwrap_or_else(|| order.order_number.clone()),
        customer_name: order.customer_name.clone(),
        issued_at: now_millis(),
        total,
        status,
        pdf_url: None,
        created_at: now_millis(),
    };
    let saved = invoice::create(&state.pool, &row)
        .await
        .map_err(|e| InvoiceError::Database(e.to_string()))?;

    sync_log::record(
        &state.pool,
        "invoicing",
        "create",
        true,
        format!("Invoice {} for order {}", response.id, order.order_number),
        None,
    )
    .await;

    Ok(saved)
}

/// Settle an invoice on the remote platform and mirror the status locally
pub async fn mark_paid(state: &ServerState, inv: &Invoice) -> Result<Invoice, InvoiceError> {
    if let Some(external_id) = &inv.external_id {
        if let Err(e) = state
            .invoicing
            .pay_document(external_id, inv.total, now_millis() / 1000)
            .await
        {
            sync_log::record(
                &state.pool,
                "invoicing",
                "pay",
                false,
                e.to_string(),
                Some(serde_json::json!({ "invoice_id": inv.id })),
            )
            .await;
            return Err(e);
        }
    }

    let updated = invoice::set_status(&state.pool, inv.id, InvoiceStatus::Paid)
        .await
        .map_err(|e| InvoiceError::Database(e.to_string()))?;

    sync_log::record(
        &state.pool,
        "invoicing",
        "pay",
        true,
        format!("Invoice {} marked paid", inv.id),
        None,
    )
    .await;

    Ok(updated)
}

/// Rendered PDF bytes for a local invoice
pub async fn fetch_pdf(state: &ServerState, inv: &Invoice) -> Result<Vec<u8>, InvoiceError> {
    let external_id = inv.external_id.as_deref().ok_or(InvoiceError::Api {
        status: 404,
        body: "Invoice has no external document".to_string(),
    })?;
    state.invoicing.fetch_pdf(external_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, unit_price: f64) -> OrderItem {
        OrderItem {
            id: 1,
            order_id: 1,
            product_id: 1,
            product_name: "Traje lunares".to_string(),
            quantity,
            unit_price,
            notes: None,
        }
    }

    #[test]
    fn rejects_zero_quantity_naming_the_line() {
        let items = vec![item(1, 10.0), item(0, 10.0)];
        match validate_lines(&items) {
            Err(InvoiceError::InvalidLine { index: 1, field: "quantity" }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_positive_price_naming_the_line() {
        let items = vec![item(1, 10.0), item(2, 25.0), item(3, 0.0)];
        match validate_lines(&items) {
            Err(InvoiceError::InvalidLine { index: 2, field: "unit_price" }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn accepts_valid_lines() {
        let items = vec![item(1, 10.0), item(2, 25.5)];
        assert!(validate_lines(&items).is_ok());
    }
}
