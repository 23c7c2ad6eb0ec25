use std::sync::Arc;

use dineflow::domain::catalog::RawMenuRow;
use dineflow::domain::order::{CartLine, CustomerInput, OrderRevision, OrderStatus, OrderType};
use dineflow::storage::sqlite::{self, SqliteCatalogStore, SqliteOrderStore};
use dineflow::storage::{CatalogStore, OrderStore};
use dineflow::{
    logging, metrics, AnalyticsAggregator, AppConfig, CatalogService, Metrics, OrderLifecycle,
    TenantId, TimeWindow,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let config = AppConfig::from_env();

    tracing::info!("Starting dineflow catalog and order engine demo");

    // === 1. Open the store ===
    let pool = sqlite::connect(&config.db()).await?;
    let catalog_store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalogStore::new(pool.clone()));
    let order_store: Arc<dyn OrderStore> = Arc::new(SqliteOrderStore::new(pool));

    // === 2. Initialize Prometheus metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("Metrics registry created with {} metrics", metrics.registry().gather().len());

    // Start metrics HTTP server in background thread
    if let Some(port) = config.metrics_port() {
        let server_metrics = metrics.clone();
        std::thread::spawn(move || {
            let system = actix_web::rt::System::new();
            if let Err(e) = system.block_on(metrics::start_metrics_server(server_metrics, port)) {
                tracing::error!(port, error = %e, "Metrics server error");
            }
        });
    }

    let catalog = CatalogService::new(catalog_store.clone(), metrics.clone());
    let lifecycle = OrderLifecycle::new(catalog_store, order_store.clone(), metrics.clone());
    let analytics = AnalyticsAggregator::new(order_store, metrics.clone(), config.default_offset());

    let tenant = TenantId::parse("demo@dineflow.local")
        .ok_or_else(|| anyhow::anyhow!("demo tenant id is blank"))?;

    // === 3. Import a menu ===
    let outcome = catalog
        .bulk_replace(
            &tenant,
            vec![
                RawMenuRow::new("Paneer Tikka", "240", "Starters"),
                RawMenuRow::new("Butter Naan", "45.50", "Breads"),
                RawMenuRow::new("Masala Chai", "30", "Drinks"),
                RawMenuRow::new("", "99", "Drinks"),
            ],
        )
        .await?;
    for warning in &outcome.warnings {
        tracing::warn!("Skipped import row: {}", warning);
    }
    let menu = catalog.list_items(&tenant).await?;
    tracing::info!(items = menu.len(), "Menu imported");

    // === 4. Walk an order through its lifecycle ===
    let lines: Vec<CartLine> = menu.iter().take(2).map(|item| CartLine::new(item.id, 2)).collect();
    let order = lifecycle
        .submit(&tenant, OrderType::DineIn, CustomerInput::dine_in("5"), lines)
        .await?;
    tracing::info!(order_id = %order.id(), total = %order.total_cost(), "Order placed");

    let revision = OrderRevision {
        order_type: Some(OrderType::Delivery),
        customer: Some(CustomerInput::delivery("+15550100", "Tower A", "101")),
        cart: None,
    };
    let order = lifecycle.edit(&tenant, order.id(), revision).await?;

    for status in [OrderStatus::Preparing, OrderStatus::Ready, OrderStatus::Delivered] {
        let order = lifecycle.transition_status(&tenant, order.id(), status).await?;
        tracing::info!(order_id = %order.id(), status = %order.status(), "Order advanced");
    }

    // === 5. Analytics ===
    let report = analytics.report(&tenant, analytics.query(TimeWindow::Last7Days)).await?;
    tracing::info!("Weekly report: {}", serde_json::to_string_pretty(&report)?);

    if config.metrics_port().is_some() {
        tracing::info!("Demo complete, serving metrics until Ctrl-C");
        tokio::signal::ctrl_c().await?;
    } else {
        tracing::info!("Demo complete!");
    }

    Ok(())
}
