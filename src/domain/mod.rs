// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each area has its own subdirectory with value objects, errors and the
// service that drives it. Persistence is reached only through the traits in
// `crate::storage`.
//
// ============================================================================

pub mod tenant;
pub mod catalog;
pub mod order;
pub mod analytics;
