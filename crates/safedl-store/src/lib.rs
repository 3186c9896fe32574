//! Storage layer for safedl.
//!
//! This crate persists the two stores behind the catalog table:
//!
//! - the **Record Store**: `SoftwareRecord` documents, one collection per category
//! - the **Column Configuration Store**: one ordered `ColumnConfiguration` per category
//!
//! Both live behind the [`Store`] trait. Column add, rename and delete are
//! compound operations that rewrite records and configuration as one unit,
//! so the record shape and the configuration never drift apart through them.
//!
//! # Backends
//!
//! - [`MemoryStore`]: always available, used by tests and ephemeral deployments
//! - `RocksStore`: persistent, behind the `rocksdb-backend` feature
//!
//! # Example
//!
//! ```
//! use safedl_core::{Category, ColumnDescriptor, ColumnType};
//! use safedl_store::{MemoryStore, Store};
//!
//! let store = MemoryStore::new();
//! store.insert_record(Category::Tools, "7-Zip", Default::default()).unwrap();
//!
//! let column = ColumnDescriptor::new("License Key", ColumnType::Text).unwrap();
//! let change = store.add_column(Category::Tools, column).unwrap();
//! assert_eq!(change.records_updated, 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
pub mod migration;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod schema;

use std::collections::BTreeMap;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use migration::ColumnMutation;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use safedl_core::{
    Category, ColumnConfiguration, ColumnDescriptor, FieldValue, RecordId, SoftwareRecord,
};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Create a record with defaults for every configured column.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if the name is blank or a field does
    /// not fit the category configuration.
    fn insert_record(
        &self,
        category: Category,
        name: &str,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<SoftwareRecord>;

    /// Apply an inline edit to a record.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the record doesn't exist.
    /// - `StoreError::Validation` if a field does not fit the configuration.
    fn update_record(
        &self,
        category: Category,
        id: &RecordId,
        name: Option<String>,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<SoftwareRecord>;

    /// Get a record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_record(&self, category: Category, id: &RecordId) -> Result<Option<SoftwareRecord>>;

    /// Delete a record by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record doesn't exist.
    fn delete_record(&self, category: Category, id: &RecordId) -> Result<()>;

    /// List the records of a category in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_records(&self, category: Category) -> Result<Vec<SoftwareRecord>>;

    /// Count the records of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn count_records(&self, category: Category) -> Result<u64>;

    // =========================================================================
    // Record Field Operations
    // =========================================================================

    /// Add fields to every record of a category, keeping existing values.
    ///
    /// Returns the number of records that changed. The configuration is not
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn add_record_fields(&self, category: Category, fields: &[(String, FieldValue)])
        -> Result<usize>;

    /// Remove fields from every record of a category.
    ///
    /// Returns the number of records that changed. The configuration is not
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn remove_record_fields(&self, category: Category, fields: &[String]) -> Result<usize>;

    // =========================================================================
    // Column Configuration Operations
    // =========================================================================

    /// Get the stored configuration of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_column_config(&self, category: Category) -> Result<Option<ColumnConfiguration>>;

    /// Replace the configuration of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_column_config(&self, config: &ColumnConfiguration) -> Result<()>;

    /// Get the configuration of a category, or an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn column_config(&self, category: Category) -> Result<ColumnConfiguration> {
        Ok(self
            .get_column_config(category)?
            .unwrap_or_else(|| ColumnConfiguration::empty(category)))
    }

    // =========================================================================
    // Compound Column Operations
    // =========================================================================

    /// Write the column's default fields into every record and append the
    /// column to the configuration, atomically.
    ///
    /// # Errors
    ///
    /// - `StoreError::Validation` if the key is already configured.
    /// - `StoreError::Database` if the write fails; nothing is written then.
    fn add_column(&self, category: Category, column: ColumnDescriptor) -> Result<ColumnMutation>;

    /// Change a column label. Records are not touched.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the key is not configured.
    /// - `StoreError::Validation` if the label is blank.
    fn rename_column(&self, category: Category, key: &str, label: &str) -> Result<ColumnMutation>;

    /// Strip the column's physical fields from every record and remove it
    /// from the configuration, atomically.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the key is not configured.
    /// - `StoreError::Database` if the write fails; nothing is written then.
    fn delete_column(&self, category: Category, key: &str) -> Result<ColumnMutation>;
}
