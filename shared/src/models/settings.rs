//! Settings Model (singleton)
//!
//! Integration configuration read by the workflow and adapters at call time.
//! Credentials do not live here; they come from the environment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Settings singleton (row id = 1)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Settings {
    pub id: i64,
    pub store_name: String,
    pub store_phone: Option<String>,
    /// Notification recipients (raw phone numbers, normalized at send time)
    #[cfg_attr(feature = "db", sqlx(json))]
    pub recipients: Vec<String>,
    /// Default low-stock threshold for new products
    pub stock_min_default: i64,
    pub sync_enabled: bool,
    pub sync_interval_minutes: i64,
    /// Message template overrides keyed by template name
    #[cfg_attr(feature = "db", sqlx(json))]
    pub templates: HashMap<String, String>,
    pub updated_at: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: 1,
            store_name: "Lunares".to_string(),
            store_phone: None,
            recipients: Vec::new(),
            stock_min_default: 2,
            sync_enabled: false,
            sync_interval_minutes: 60,
            templates: HashMap::new(),
            updated_at: 0,
        }
    }
}

/// Update settings payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub store_name: Option<String>,
    pub store_phone: Option<String>,
    pub recipients: Option<Vec<String>>,
    pub stock_min_default: Option<i64>,
    pub sync_enabled: Option<bool>,
    pub sync_interval_minutes: Option<i64>,
    pub templates: Option<HashMap<String, String>>,
}
