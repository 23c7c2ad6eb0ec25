// ============================================================================
// Order Domain - Business Logic for the Order Aggregate
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (OrderType, OrderItem snapshots, CartLine)
// - Customer details per order type
// - Status state machine (OrderStatus transition table)
// - Cart staging
// - Errors (OrderError enum)
// - Aggregate (Order invariants)
// - Lifecycle (OrderLifecycle orchestration over the stores)
//
// ============================================================================

pub mod value_objects;
pub mod customer;
pub mod status;
pub mod cart;
pub mod errors;
pub mod aggregate;
pub mod lifecycle;

// Re-export for convenience
pub use value_objects::*;
pub use customer::*;
pub use status::*;
pub use cart::*;
pub use errors::*;
pub use aggregate::*;
pub use lifecycle::*;
