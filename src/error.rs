use serde::{Deserialize, Serialize};

// ============================================================================
// Error Taxonomy
// ============================================================================
//
// Every component error (CatalogError, OrderError, StorageError) maps onto one
// of these kinds so callers can decide how to respond without matching on
// individual variants.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input field. Nothing was written.
    Validation,
    /// Absent id, or an id owned by another tenant.
    NotFound,
    /// The entity is in a state that forbids the operation.
    Conflict,
    /// A bulk import produced no usable rows. Catalog untouched.
    NoValidRows,
    /// I/O or transaction failure. Any multi-row write has been rolled back.
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NoValidRows => "no_valid_rows",
            ErrorKind::Storage => "storage",
        }
    }

    /// Whether the caller can fix the request and try again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ErrorKind::Storage)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
