use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,dineflow=debug";

/// Initialize structured logging with environment-based filtering.
/// Default to INFO level (DEBUG for this crate), overridable with RUST_LOG.
/// Example: RUST_LOG=dineflow=trace cargo run
pub fn init() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .init();
}
