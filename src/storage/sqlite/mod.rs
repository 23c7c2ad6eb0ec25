// ============================================================================
// SQLite Storage Engine
// ============================================================================
//
// One pool per process. WAL journal so readers never block the writer, and a
// busy timeout so concurrent writers queue on SQLite's lock instead of
// failing straight away.
//
// ============================================================================

mod catalog_store;
mod order_store;
mod schema;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

pub use catalog_store::SqliteCatalogStore;
pub use order_store::SqliteOrderStore;
pub use schema::migrate;

use super::StorageResult;

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl DbConfig {
    /// Private in-memory database. A single connection is kept alive for the
    /// pool's lifetime, since the database disappears with its connection.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            busy_timeout: Duration::from_millis(5000),
        }
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://dineflow.db".to_string(),
            max_connections: 5,
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

/// Open the pool and bring the schema up to date.
pub async fn connect(config: &DbConfig) -> StorageResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(config.busy_timeout);

    let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
    if config.is_in_memory() {
        pool_options = pool_options
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    }

    let pool = pool_options.connect_with(options).await?;

    tracing::info!(
        url = %config.url,
        max_connections = config.max_connections,
        busy_timeout_ms = config.busy_timeout.as_millis() as u64,
        "Database connection established (SQLite WAL)"
    );

    migrate(&pool).await?;
    Ok(pool)
}
