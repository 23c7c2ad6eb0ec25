#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use dineflow::storage::sqlite::{self, DbConfig, SqliteCatalogStore, SqliteOrderStore};
use dineflow::storage::{CatalogStore, OrderStore};
use dineflow::{AnalyticsAggregator, CatalogService, Metrics, OrderLifecycle, TenantId};
use sqlx::SqlitePool;

pub struct Harness {
    pub pool: SqlitePool,
    pub metrics: Arc<Metrics>,
    pub catalog_store: Arc<dyn CatalogStore>,
    pub order_store: Arc<dyn OrderStore>,
    pub catalog: CatalogService,
    pub lifecycle: OrderLifecycle,
    pub analytics: AnalyticsAggregator,
}

impl Harness {
    pub async fn in_memory() -> Self {
        Self::with_config(DbConfig::in_memory()).await
    }

    /// File-backed database for tests that need several connections.
    pub async fn on_disk(dir: &Path) -> Self {
        Self::with_config(DbConfig {
            url: format!("sqlite://{}", dir.join("dineflow.db").display()),
            max_connections: 8,
            ..DbConfig::default()
        })
        .await
    }

    async fn with_config(config: DbConfig) -> Self {
        let pool = sqlite::connect(&config).await.unwrap();
        let metrics = Arc::new(Metrics::new().unwrap());
        let catalog_store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalogStore::new(pool.clone()));
        let order_store: Arc<dyn OrderStore> = Arc::new(SqliteOrderStore::new(pool.clone()));
        let offset: FixedOffset = Utc.fix();

        Self {
            catalog: CatalogService::new(catalog_store.clone(), metrics.clone()),
            lifecycle: OrderLifecycle::new(catalog_store.clone(), order_store.clone(), metrics.clone()),
            analytics: AnalyticsAggregator::new(order_store.clone(), metrics.clone(), offset),
            pool,
            metrics,
            catalog_store,
            order_store,
        }
    }

    /// Make every insert of a menu item named `name` fail inside SQLite.
    pub async fn poison_menu_item(&self, name: &str) {
        sqlx::query(&format!(
            "CREATE TRIGGER poison_menu_item BEFORE INSERT ON menu_items
             WHEN NEW.name = '{name}'
             BEGIN SELECT RAISE(ABORT, 'injected storage fault'); END"
        ))
        .execute(&self.pool)
        .await
        .unwrap();
    }
}

pub fn tenant(raw: &str) -> TenantId {
    TenantId::parse(raw).unwrap()
}
