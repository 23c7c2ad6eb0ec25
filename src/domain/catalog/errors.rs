use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::tenant::ItemId;
use crate::error::ErrorKind;
use crate::storage::StorageError;
use super::value_objects::RowWarning;

// ============================================================================
// Catalog Business Rule Errors
// ============================================================================

/// A single rejected field on a menu item.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "field", content = "detail", rename_all = "snake_case")]
pub enum FieldError {
    #[error("Name is missing or blank")]
    EmptyName,

    #[error("Price must be a positive number, got {0}")]
    NonPositivePrice(Decimal),

    #[error("Price {0} exceeds the maximum of {max}", max = super::validation::MAX_PRICE)]
    PriceTooLarge(Decimal),

    #[error("Price is missing or not a number ('{0}')")]
    UnparseablePrice(String),

    #[error("Category is missing or blank")]
    EmptyCategory,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid menu item: {0}")]
    Validation(#[from] FieldError),

    #[error("Menu item not found: {0}")]
    NotFound(ItemId),

    #[error("Import contains no data rows")]
    EmptyImport,

    #[error("No valid menu items found in import ({} rows rejected)", warnings.len())]
    NoValidRows { warnings: Vec<RowWarning> },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation(_) => ErrorKind::Validation,
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::EmptyImport | CatalogError::NoValidRows { .. } => ErrorKind::NoValidRows,
            CatalogError::Storage(e) => e.kind(),
        }
    }
}
