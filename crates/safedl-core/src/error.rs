//! Error types for safedl.

use crate::ids::IdError;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur in catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Input rejected before any store write.
    #[error("validation error: {0}")]
    Validation(String),

    /// The referenced column key is absent from the configuration.
    #[error("column not found: {key} in {category}")]
    ColumnNotFound {
        /// Category that was searched.
        category: String,
        /// The missing column key.
        key: String,
    },

    /// The referenced record does not exist.
    #[error("record not found: {id}")]
    RecordNotFound {
        /// The missing record ID.
        id: String,
    },

    /// Unknown category name.
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    /// Unknown column type name.
    #[error("invalid column type: {0}")]
    InvalidColumnType(String),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
