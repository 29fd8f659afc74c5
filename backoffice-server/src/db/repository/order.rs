//! Order Repository
//!
//! Order rows and their line items. Multi-row writes go through a
//! transaction; stock movement is handled by the fulfillment workflow,
//! not here.

use super::{RepoError, RepoResult};
use shared::models::{
    Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, OrderUpdate, OrderWithItems,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Generate the next human-readable order number (ENC-YYYY-NNNN)
pub async fn next_order_number(pool: &SqlitePool) -> RepoResult<String> {
    let year = chrono::Utc::now().format("%Y").to_string();
    let prefix = format!("ENC-{year}-");
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE order_number LIKE ?")
        .bind(format!("{prefix}%"))
        .fetch_one(pool)
        .await?;
    Ok(format!("{prefix}{:04}", count + 1))
}

/// Find orders, optionally filtered by status, an order-number/customer
/// search term and a creation date range
pub async fn find(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    search: Option<String>,
    from: Option<i64>,
    to: Option<i64>,
) -> RepoResult<Vec<Order>> {
    let pattern = search.map(|s| format!("%{}%", s));
    let rows = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders
         WHERE (?1 IS NULL OR status = ?1)
           AND (?2 IS NULL OR order_number LIKE ?2 OR customer_name LIKE ?2)
           AND (?3 IS NULL OR created_at >= ?3)
           AND (?4 IS NULL OR created_at <= ?4)
         ORDER BY created_at DESC",
    )
    .bind(status)
    .bind(pattern)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Find order by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Line items for an order
pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_item WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Order with its line items
pub async fn find_with_items(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderWithItems>> {
    let Some(order) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let items = find_items(pool, id).await?;
    Ok(Some(OrderWithItems { order, items }))
}

/// Persist an order and its line items in one transaction. `total` is the
/// server-recomputed value and `names` carries the product name snapshot per
/// line, parallel to `data.items`.
pub async fn create_with_items(
    pool: &SqlitePool,
    data: &OrderCreate,
    total: f64,
    names: &[String],
) -> RepoResult<OrderWithItems> {
    let id = snowflake_id();
    let order_number = next_order_number(pool).await?;
    let now = now_millis();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO orders
            (id, order_number, customer_name, customer_phone, customer_email,
             status, delivery_method, delivery_date, total, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, ?7, ?8, ?9, ?10, ?10)",
    )
    .bind(id)
    .bind(&order_number)
    .bind(&data.customer_name)
    .bind(&data.customer_phone)
    .bind(&data.customer_email)
    .bind(data.delivery_method)
    .bind(data.delivery_date)
    .bind(total)
    .bind(&data.notes)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for (item, name) in data.items.iter().zip(names) {
        insert_item(&mut tx, id, item, name).await?;
    }

    tx.commit().await?;

    find_with_items(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
}

/// Partial update of the order header fields
pub async fn update_header(pool: &SqlitePool, id: i64, data: &OrderUpdate) -> RepoResult<Order> {
    let result = sqlx::query(
        "UPDATE orders SET
            customer_name = COALESCE(?1, customer_name),
            customer_phone = COALESCE(?2, customer_phone),
            customer_email = COALESCE(?3, customer_email),
            delivery_method = COALESCE(?4, delivery_method),
            delivery_date = COALESCE(?5, delivery_date),
            notes = COALESCE(?6, notes),
            updated_at = ?7
         WHERE id = ?8",
    )
    .bind(&data.customer_name)
    .bind(&data.customer_phone)
    .bind(&data.customer_email)
    .bind(data.delivery_method)
    .bind(data.delivery_date)
    .bind(&data.notes)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {} not found", id)));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
}

/// Replace all line items and the total in one transaction
pub async fn replace_items(
    pool: &SqlitePool,
    order_id: i64,
    items: &[OrderItemInput],
    total: f64,
    names: &[String],
) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM order_item WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

    for (item, name) in items.iter().zip(names) {
        insert_item(&mut tx, order_id, item, name).await?;
    }

    sqlx::query("UPDATE orders SET total = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(total)
        .bind(now_millis())
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Persist a status change
pub async fn set_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<Order> {
    let result = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {} not found", id)));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
}

/// Delete an order and (via cascade) its line items
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {} not found", id)));
    }
    Ok(true)
}

async fn insert_item(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    order_id: i64,
    item: &OrderItemInput,
    product_name: &str,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item (id, order_id, product_id, product_name, quantity, unit_price, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(snowflake_id())
    .bind(order_id)
    .bind(item.product_id)
    .bind(product_name)
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(&item.notes)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
