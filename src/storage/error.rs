use crate::domain::tenant::OrderId;
use crate::error::ErrorKind;

// ============================================================================
// Storage Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt row in {table}: {reason}")]
    Corrupt { table: &'static str, reason: String },

    #[error("Concurrent modification of order {0}")]
    VersionConflict(OrderId),
}

impl StorageError {
    pub fn corrupt(table: &'static str, reason: impl Into<String>) -> Self {
        StorageError::Corrupt {
            table,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::VersionConflict(_) => ErrorKind::Conflict,
            _ => ErrorKind::Storage,
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
