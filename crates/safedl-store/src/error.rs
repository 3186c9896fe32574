//! Error types for safedl storage.

use safedl_core::CatalogError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record or column not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity (`record`, `column`).
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// The requested change was rejected before anything was written.
    #[error("validation error: {0}")]
    Validation(String),
}

impl From<CatalogError> for StoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ColumnNotFound { key, .. } => Self::NotFound {
                entity: "column",
                id: key,
            },
            CatalogError::RecordNotFound { id } => Self::NotFound {
                entity: "record",
                id,
            },
            CatalogError::Validation(msg) => Self::Validation(msg),
            other @ (CatalogError::InvalidCategory(_)
            | CatalogError::InvalidColumnType(_)
            | CatalogError::InvalidId(_)) => Self::Validation(other.to_string()),
        }
    }
}
