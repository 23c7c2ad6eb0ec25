// ============================================================================
// Analytics Domain - Derived KPIs over a Tenant's Orders
// ============================================================================

pub mod window;
pub mod report;
pub mod aggregator;

// Re-export for convenience
pub use window::*;
pub use report::*;
pub use aggregator::*;
