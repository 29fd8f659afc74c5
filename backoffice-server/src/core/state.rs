//! Server state
//!
//! [`ServerState`] holds the shared handles every handler needs: the SQLite
//! pool and one client per external integration. Cloning is cheap (pool and
//! reqwest clients are reference-counted internally).

use sqlx::SqlitePool;

use crate::catalog::CatalogClient;
use crate::core::Config;
use crate::db::DbService;
use crate::invoicing::InvoicingClient;
use crate::notify::MessagingClient;

/// Server state shared by all request handlers
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// External catalog client
    pub catalog: CatalogClient,
    /// Messaging client
    pub messaging: MessagingClient,
    /// Invoicing client
    pub invoicing: InvoicingClient,
}

impl ServerState {
    /// Initialize server state:
    /// 1. Work directory structure
    /// 2. Database (work_dir/database/lunares.db) + migrations
    /// 3. Integration clients
    ///
    /// # Panics
    ///
    /// Panics when the work directory or database cannot be initialized;
    /// the server cannot run without either.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("lunares.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::with_pool(config.clone(), db_service.pool)
    }

    /// Build state around an existing pool (used by tests)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let catalog = CatalogClient::new(config.catalog.clone());
        let messaging = MessagingClient::new(config.messaging.clone());
        let invoicing = InvoicingClient::new(config.invoicing.clone());

        Self {
            config,
            pool,
            catalog,
            messaging,
            invoicing,
        }
    }
}
