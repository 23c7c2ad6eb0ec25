// ============================================================================
// dineflow - Multi-tenant menu catalog and order lifecycle engine
// ============================================================================
//
// - domain:  catalog, orders and analytics business logic
// - storage: tenant-scoped store traits and their SQLite implementation
// - metrics: Prometheus registry plus the /metrics and /health server
//
// ============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod storage;

pub use config::AppConfig;
pub use domain::analytics::{AnalyticsAggregator, AnalyticsQuery, AnalyticsReport, TimeWindow};
pub use domain::catalog::{CatalogError, CatalogService};
pub use domain::order::{OrderError, OrderLifecycle};
pub use domain::tenant::{ItemId, OrderId, TenantId};
pub use error::ErrorKind;
pub use metrics::Metrics;
