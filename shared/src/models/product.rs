//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Unit price in euros
    pub price: f64,
    pub size: Option<String>,
    pub color: Option<String>,
    /// Units on hand; written by order create/cancel and manual edits
    pub stock: i64,
    /// Low-stock alert threshold
    pub stock_min: i64,
    /// Local path or remote URL when mirroring failed
    pub image: Option<String>,
    /// Record ID on the external catalog; None until first successful push
    pub external_id: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub size: Option<String>,
    pub color: Option<String>,
    pub stock: Option<i64>,
    pub stock_min: Option<i64>,
    pub image: Option<String>,
    pub external_id: Option<i64>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub stock: Option<i64>,
    pub stock_min: Option<i64>,
    pub image: Option<String>,
    pub external_id: Option<i64>,
    pub is_active: Option<bool>,
}
