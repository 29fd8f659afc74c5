//! Order Fulfillment Workflow
//!
//! Create and status-transition logic for orders, composing the store and
//! the three adapters. Stock movement and the order row are the hard part
//! of each operation; catalog pushes and notifications are best-effort and
//! reported as explicit side-effect results instead of being silently
//! dropped. Invoice failures during a transition propagate to the caller,
//! but the already-persisted status change is not rolled back.

use serde::Serialize;

use shared::models::{
    InvoiceStatus, OrderCreate, OrderItemInput, OrderStatus, OrderUpdate, OrderWithItems, Product,
};

use crate::catalog;
use crate::core::ServerState;
use crate::db::repository::{invoice, order, product};
use crate::invoicing;
use crate::notify;
use crate::orders::money;
use crate::utils::{AppError, AppResult};

/// Result of one best-effort side effect
#[derive(Debug, Clone, Serialize)]
pub struct SideEffect {
    pub name: String,
    pub attempted: bool,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SideEffect {
    fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attempted: true,
            succeeded: true,
            error: None,
        }
    }

    fn failed(name: impl Into<String>, error: impl ToString) -> Self {
        Self {
            name: name.into(),
            attempted: true,
            succeeded: false,
            error: Some(error.to_string()),
        }
    }

    fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attempted: false,
            succeeded: false,
            error: None,
        }
    }
}

/// Order plus the side effects the operation triggered
#[derive(Debug, Serialize)]
pub struct OrderOutcome {
    #[serde(flatten)]
    pub order: OrderWithItems,
    pub side_effects: Vec<SideEffect>,
}

/// Validate line shape and stock, resolving each product. Returns the
/// products in line order. Every insufficient line is listed, not just the
/// first.
async fn validate_lines(
    state: &ServerState,
    items: &[OrderItemInput],
) -> AppResult<Vec<Product>> {
    if items.is_empty() {
        return Err(AppError::validation("Order needs at least one line item"));
    }

    let mut products = Vec::with_capacity(items.len());
    let mut insufficient = Vec::new();

    for (index, item) in items.iter().enumerate() {
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "Line {}: quantity must be positive",
                index
            )));
        }
        let p = product::find_by_id(&state.pool, item.product_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("Line {}: product {} not found", index, item.product_id))
            })?;
        if p.stock < item.quantity {
            insufficient.push(format!(
                "line {} ({}): requested {}, in stock {}",
                index, p.name, item.quantity, p.stock
            ));
        }
        products.push(p);
    }

    if !insufficient.is_empty() {
        return Err(AppError::BusinessRule(format!(
            "Insufficient stock: {}",
            insufficient.join("; ")
        )));
    }
    Ok(products)
}

/// Recompute the total server-side and reject a client total off by more
/// than one cent.
fn check_total(items: &[OrderItemInput], client_total: f64) -> AppResult<f64> {
    let total = money::lines_total(items.iter().map(|i| (i.quantity, i.unit_price)));
    if !money::money_eq(total, client_total) {
        return Err(AppError::validation(format!(
            "Total mismatch: submitted {:.2}, computed {:.2}",
            client_total, total
        )));
    }
    Ok(total)
}

/// Create an order: validate, persist, decrement stock, then fire the
/// best-effort effects (catalog push, low-stock alert, new-order message).
pub async fn create_order(state: &ServerState, data: OrderCreate) -> AppResult<OrderOutcome> {
    let products = validate_lines(state, &data.items).await?;
    let total = check_total(&data.items, data.total)?;
    let names: Vec<String> = products.iter().map(|p| p.name.clone()).collect();

    let created = order::create_with_items(&state.pool, &data, total, &names).await?;

    // Guarded decrements; a concurrent order can still win the race between
    // validation and here, in which case everything is compensated.
    let mut done: Vec<(i64, i64)> = Vec::new();
    for item in &data.items {
        let applied = product::decrement_stock(&state.pool, item.product_id, item.quantity).await?;
        if !applied {
            for (pid, qty) in &done {
                product::restore_stock(&state.pool, *pid, *qty).await?;
            }
            order::delete(&state.pool, created.order.id).await?;
            return Err(AppError::Conflict(format!(
                "Stock changed concurrently for product {}",
                item.product_id
            )));
        }
        done.push((item.product_id, item.quantity));
    }

    let mut effects = Vec::new();

    for (item, before) in data.items.iter().zip(&products) {
        let name = format!("catalog_push:{}", item.product_id);
        match catalog::push_one(state, item.product_id).await {
            Ok(_) => effects.push(SideEffect::ok(&name)),
            Err(e) => effects.push(SideEffect::failed(&name, e)),
        }

        // Alert only on crossing the threshold, not on every sale below it
        let after = before.stock - item.quantity;
        let name = format!("notify:low_stock:{}", item.product_id);
        if before.stock > before.stock_min && after <= before.stock_min {
            let outcome = notify::notify_template(
                state,
                "low_stock",
                &[
                    ("product_name", before.name.clone()),
                    ("stock", after.to_string()),
                    ("stock_min", before.stock_min.to_string()),
                ],
            )
            .await;
            effects.push(if outcome.success {
                SideEffect::ok(&name)
            } else {
                SideEffect::failed(&name, "no message sent")
            });
        } else {
            effects.push(SideEffect::skipped(&name));
        }
    }

    let outcome = notify::notify_template(
        state,
        "new_order",
        &[
            ("order_number", created.order.order_number.clone()),
            ("customer_name", created.order.customer_name.clone()),
            ("total", format!("{:.2}", created.order.total)),
        ],
    )
    .await;
    effects.push(if outcome.success {
        SideEffect::ok("notify:new_order")
    } else {
        SideEffect::failed("notify:new_order", "no message sent")
    });

    Ok(OrderOutcome {
        order: created,
        side_effects: effects,
    })
}

/// Apply a status transition and its effects. Cancellation restores stock;
/// ready/delivered notify and invoice (at most one invoice per order).
pub async fn change_status(
    state: &ServerState,
    order_id: i64,
    new_status: OrderStatus,
) -> AppResult<OrderOutcome> {
    let current = order::find_with_items(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;

    if !current.order.status.can_transition_to(new_status) {
        return Err(AppError::BusinessRule(format!(
            "Illegal transition {:?} -> {:?}",
            current.order.status, new_status
        )));
    }

    let updated = order::set_status(&state.pool, order_id, new_status).await?;
    let mut effects = Vec::new();

    match new_status {
        OrderStatus::Cancelled => {
            for item in &current.items {
                product::restore_stock(&state.pool, item.product_id, item.quantity).await?;
            }
            let outcome = notify::notify_template(
                state,
                "order_cancelled",
                &[("order_number", updated.order_number.clone())],
            )
            .await;
            effects.push(if outcome.success {
                SideEffect::ok("notify:order_cancelled")
            } else {
                SideEffect::failed("notify:order_cancelled", "no message sent")
            });
        }
        OrderStatus::Ready | OrderStatus::Delivered => {
            let outcome = notify::notify_template(
                state,
                "status_change",
                &[
                    ("order_number", updated.order_number.clone()),
                    ("status", format!("{:?}", new_status).to_lowercase()),
                ],
            )
            .await;
            effects.push(if outcome.success {
                SideEffect::ok("notify:status_change")
            } else {
                SideEffect::failed("notify:status_change", "no message sent")
            });

            let existing = invoice::find_by_order(&state.pool, order_id).await?;
            match (existing, new_status) {
                (None, OrderStatus::Ready) => {
                    invoicing::create_from_order(
                        state,
                        &updated,
                        &current.items,
                        InvoiceStatus::Issued,
                    )
                    .await?;
                    effects.push(SideEffect::ok("invoice:create"));
                }
                (None, OrderStatus::Delivered) => {
                    let inv = invoicing::create_from_order(
                        state,
                        &updated,
                        &current.items,
                        InvoiceStatus::Paid,
                    )
                    .await?;
                    effects.push(SideEffect::ok("invoice:create"));
                    invoicing::mark_paid(state, &inv).await?;
                    effects.push(SideEffect::ok("invoice:pay"));
                }
                (Some(inv), OrderStatus::Delivered) if inv.status == InvoiceStatus::Issued => {
                    invoicing::mark_paid(state, &inv).await?;
                    effects.push(SideEffect::ok("invoice:pay"));
                }
                _ => effects.push(SideEffect::skipped("invoice:create")),
            }
        }
        _ => {}
    }

    let order = order::find_with_items(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;

    Ok(OrderOutcome {
        order,
        side_effects: effects,
    })
}

/// Update order fields; when new line items are supplied they replace the
/// old set and stock moves by the per-product difference.
pub async fn update_order(
    state: &ServerState,
    order_id: i64,
    data: OrderUpdate,
) -> AppResult<OrderWithItems> {
    let current = order::find_with_items(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;

    if current.order.status.is_terminal() {
        return Err(AppError::BusinessRule(format!(
            "Order {} is {:?} and cannot be edited",
            order_id, current.order.status
        )));
    }

    order::update_header(&state.pool, order_id, &data).await?;

    if let Some(items) = &data.items {
        if items.is_empty() {
            return Err(AppError::validation("Order needs at least one line item"));
        }

        let mut names = Vec::with_capacity(items.len());
        let mut old_qty: std::collections::HashMap<i64, i64> = std::collections::HashMap::new();
        for item in &current.items {
            *old_qty.entry(item.product_id).or_default() += item.quantity;
        }

        // Per-product stock delta between the old and new line sets
        let mut deltas: Vec<(i64, i64)> = Vec::new();
        for (index, item) in items.iter().enumerate() {
            if item.quantity <= 0 {
                return Err(AppError::validation(format!(
                    "Line {}: quantity must be positive",
                    index
                )));
            }
            let p = product::find_by_id(&state.pool, item.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::validation(format!(
                        "Line {}: product {} not found",
                        index, item.product_id
                    ))
                })?;
            names.push(p.name);
            let previous = old_qty.remove(&item.product_id).unwrap_or(0);
            deltas.push((item.product_id, item.quantity - previous));
        }
        // Products dropped from the order get their full quantity back
        deltas.extend(old_qty.into_iter().map(|(pid, qty)| (pid, -qty)));

        let mut applied: Vec<(i64, i64)> = Vec::new();
        for (pid, delta) in &deltas {
            let ok = if *delta > 0 {
                product::decrement_stock(&state.pool, *pid, *delta).await?
            } else {
                if *delta < 0 {
                    product::restore_stock(&state.pool, *pid, -*delta).await?;
                }
                true
            };
            if !ok {
                for (pid, delta) in &applied {
                    product::restore_stock(&state.pool, *pid, *delta).await?;
                }
                return Err(AppError::BusinessRule(format!(
                    "Insufficient stock for product {}",
                    pid
                )));
            }
            applied.push((*pid, *delta));
        }

        let total = money::lines_total(items.iter().map(|i| (i.quantity, i.unit_price)));
        order::replace_items(&state.pool, order_id, items, total, &names).await?;
    }

    order::find_with_items(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))
}
