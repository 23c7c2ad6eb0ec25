// ============================================================================
// Catalog Domain - Tenant Menu Management
// ============================================================================
//
// - Value objects (MenuItem, NewMenuItem, MenuItemPatch, RawMenuRow)
// - Field validation shared by single-item and bulk paths
// - Errors (CatalogError, FieldError)
// - Service (CatalogService, owns the bulk-replace protocol)
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod validation;
pub mod service;

// Re-export for convenience
pub use value_objects::*;
pub use errors::*;
pub use service::*;
