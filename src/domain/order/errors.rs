use crate::domain::tenant::{ItemId, OrderId};
use crate::error::ErrorKind;
use crate::storage::StorageError;
use super::status::OrderStatus;
use super::value_objects::OrderType;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order items cannot be empty")]
    EmptyItems,

    #[error("Invalid quantity for item {0}: must be at least 1")]
    InvalidQuantity(ItemId),

    #[error("Item {0} appears more than once in the order")]
    DuplicateItem(ItemId),

    #[error("Missing customer detail for {order_type} order: {field}")]
    MissingCustomerField {
        order_type: OrderType,
        field: &'static str,
    },

    #[error("Customer detail '{field}' does not apply to {order_type} orders")]
    UnexpectedCustomerField {
        order_type: OrderType,
        field: &'static str,
    },

    #[error("Order total is too large to represent")]
    TotalOverflow,

    #[error("Menu item {0} is no longer available")]
    StaleCart(ItemId),

    #[error("Order not found: {0}")]
    NotFound(OrderId),

    #[error("Order is already {0}")]
    Terminal(OrderStatus),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::EmptyItems
            | OrderError::InvalidQuantity(_)
            | OrderError::DuplicateItem(_)
            | OrderError::MissingCustomerField { .. }
            | OrderError::UnexpectedCustomerField { .. }
            | OrderError::TotalOverflow => ErrorKind::Validation,
            OrderError::StaleCart(_) | OrderError::NotFound(_) => ErrorKind::NotFound,
            OrderError::Terminal(_) | OrderError::InvalidTransition { .. } => ErrorKind::Conflict,
            OrderError::Storage(e) => e.kind(),
        }
    }
}
