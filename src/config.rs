use chrono::{FixedOffset, Offset, Utc};
use std::time::Duration;

use crate::storage::sqlite::DbConfig;

/// Process configuration, read from the environment (and `.env` when present).
///
/// | Variable | Default |
/// |----------|---------|
/// | DATABASE_URL | sqlite://dineflow.db |
/// | DB_MAX_CONNECTIONS | 5 |
/// | DB_BUSY_TIMEOUT_MS | 5000 |
/// | METRICS_PORT | 9090 (0 disables the server) |
/// | DEFAULT_UTC_OFFSET_MINUTES | 0 |
///
/// Unparseable values fall back to the default.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_busy_timeout_ms: u64,
    pub metrics_port: u16,
    pub default_utc_offset_minutes: i32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
            raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
        }

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://dineflow.db".into()),
            db_max_connections: parsed(lookup("DB_MAX_CONNECTIONS"), 5),
            db_busy_timeout_ms: parsed(lookup("DB_BUSY_TIMEOUT_MS"), 5000),
            metrics_port: parsed(lookup("METRICS_PORT"), 9090),
            default_utc_offset_minutes: parsed(lookup("DEFAULT_UTC_OFFSET_MINUTES"), 0),
        }
    }

    pub fn db(&self) -> DbConfig {
        DbConfig {
            url: self.database_url.clone(),
            max_connections: self.db_max_connections.max(1),
            busy_timeout: Duration::from_millis(self.db_busy_timeout_ms),
        }
    }

    /// `None` when the metrics server is disabled.
    pub fn metrics_port(&self) -> Option<u16> {
        (self.metrics_port != 0).then_some(self.metrics_port)
    }

    /// Offset used for analytics day and hour buckets. Out-of-range values
    /// fall back to UTC.
    pub fn default_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.default_utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}
