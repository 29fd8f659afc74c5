//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Find products, optionally filtered by category or a name search term
pub async fn find(
    pool: &SqlitePool,
    category: Option<String>,
    search: Option<String>,
    include_inactive: bool,
) -> RepoResult<Vec<Product>> {
    let pattern = search.map(|s| format!("%{}%", s));
    let rows = sqlx::query_as::<_, Product>(
        "SELECT * FROM product
         WHERE (?1 IS NULL OR category = ?1)
           AND (?2 IS NULL OR name LIKE ?2)
           AND (?3 OR is_active = 1)
         ORDER BY name",
    )
    .bind(category)
    .bind(pattern)
    .bind(include_inactive)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Find product by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, Product>("SELECT * FROM product WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Find product by its id in the remote catalog
pub async fn find_by_external_id(pool: &SqlitePool, external_id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, Product>("SELECT * FROM product WHERE external_id = ?")
        .bind(external_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Products at or below their low-stock threshold
pub async fn find_low_stock(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(
        "SELECT * FROM product WHERE is_active = 1 AND stock <= stock_min ORDER BY stock",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Create a new product. `stock_min_default` is the store-wide threshold
/// applied when the payload leaves it out.
pub async fn create(
    pool: &SqlitePool,
    data: ProductCreate,
    stock_min_default: i64,
) -> RepoResult<Product> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("Product name is required".to_string()));
    }
    if data.price < 0.0 {
        return Err(RepoError::Validation("Price cannot be negative".to_string()));
    }

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO product
            (id, name, description, category, price, size, color, stock, stock_min,
             image, external_id, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 1, ?12, ?12)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.category)
    .bind(data.price)
    .bind(&data.size)
    .bind(&data.color)
    .bind(data.stock.unwrap_or(0))
    .bind(data.stock_min.unwrap_or(stock_min_default))
    .bind(&data.image)
    .bind(data.external_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
}

/// Partial update; None fields keep their current value
pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    if let Some(price) = data.price {
        if price < 0.0 {
            return Err(RepoError::Validation("Price cannot be negative".to_string()));
        }
    }

    let result = sqlx::query(
        "UPDATE product SET
            name = COALESCE(?1, name),
            description = COALESCE(?2, description),
            category = COALESCE(?3, category),
            price = COALESCE(?4, price),
            size = COALESCE(?5, size),
            color = COALESCE(?6, color),
            stock = COALESCE(?7, stock),
            stock_min = COALESCE(?8, stock_min),
            image = COALESCE(?9, image),
            external_id = COALESCE(?10, external_id),
            is_active = COALESCE(?11, is_active),
            updated_at = ?12
         WHERE id = ?13",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.category)
    .bind(data.price)
    .bind(&data.size)
    .bind(&data.color)
    .bind(data.stock)
    .bind(data.stock_min)
    .bind(&data.image)
    .bind(data.external_id)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {} not found", id)));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
}

/// Atomically decrement stock, refusing to go negative. Returns false when
/// the row had less stock than requested (or does not exist); the caller
/// decides whether that is a conflict or a race.
pub async fn decrement_stock(pool: &SqlitePool, id: i64, quantity: i64) -> RepoResult<bool> {
    let result = sqlx::query(
        "UPDATE product SET stock = stock - ?1, updated_at = ?2
         WHERE id = ?3 AND stock >= ?1",
    )
    .bind(quantity)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Add stock back (order cancelled or items replaced)
pub async fn restore_stock(pool: &SqlitePool, id: i64, quantity: i64) -> RepoResult<()> {
    sqlx::query("UPDATE product SET stock = stock + ?1, updated_at = ?2 WHERE id = ?3")
        .bind(quantity)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Soft delete: deactivate rather than drop, order items reference the row
pub async fn deactivate(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("UPDATE product SET is_active = 0, updated_at = ?1 WHERE id = ?2")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {} not found", id)));
    }
    Ok(true)
}
