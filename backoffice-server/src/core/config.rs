//! Server configuration
//!
//! All settings can be overridden through environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | WORK_DIR | /var/lib/lunares | Work directory (database, images, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | Runtime environment |
//! | CATALOG_BASE_URL | — | External catalog API base URL |
//! | CATALOG_KEY / CATALOG_SECRET | — | Catalog API credentials |
//! | MESSAGING_BASE_URL | — | Messaging API base URL |
//! | MESSAGING_ACCOUNT_SID / MESSAGING_AUTH_TOKEN | — | Messaging credentials |
//! | MESSAGING_FROM | — | Sender address (without channel prefix) |
//! | INVOICING_BASE_URL | — | Invoicing API base URL |
//! | INVOICING_API_KEY | — | Invoicing API key |

use std::path::PathBuf;

/// External catalog API settings (key/secret query auth)
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub key: String,
    pub secret: String,
}

/// Messaging API settings (basic auth, channel-prefixed addresses)
#[derive(Debug, Clone)]
pub struct MessagingConfig {
    pub base_url: String,
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number without channel prefix
    pub from: String,
    /// Transport channel prefix, e.g. "whatsapp:"
    pub channel_prefix: String,
}

/// Invoicing API settings (static key header)
#[derive(Debug, Clone)]
pub struct InvoicingConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding database, mirrored images and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    pub catalog: CatalogConfig,
    pub messaging: MessagingConfig,
    pub invoicing: InvoicingConfig,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/lunares".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            catalog: CatalogConfig {
                base_url: std::env::var("CATALOG_BASE_URL").unwrap_or_default(),
                key: std::env::var("CATALOG_KEY").unwrap_or_default(),
                secret: std::env::var("CATALOG_SECRET").unwrap_or_default(),
            },
            messaging: MessagingConfig {
                base_url: std::env::var("MESSAGING_BASE_URL").unwrap_or_default(),
                account_sid: std::env::var("MESSAGING_ACCOUNT_SID").unwrap_or_default(),
                auth_token: std::env::var("MESSAGING_AUTH_TOKEN").unwrap_or_default(),
                from: std::env::var("MESSAGING_FROM").unwrap_or_default(),
                channel_prefix: std::env::var("MESSAGING_CHANNEL_PREFIX")
                    .unwrap_or_else(|_| "whatsapp:".into()),
            },
            invoicing: InvoicingConfig {
                base_url: std::env::var("INVOICING_BASE_URL").unwrap_or_default(),
                api_key: std::env::var("INVOICING_API_KEY").unwrap_or_default(),
            },
        }
    }

    /// Database directory (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Mirrored product images directory (work_dir/images)
    pub fn images_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("images")
    }

    /// Ensure the work directory structure exists
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.images_dir())?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
