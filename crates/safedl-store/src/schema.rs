//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Software records, keyed by `category_tag || record_id` (ULID).
    pub const RECORDS: &str = "records";

    /// Column configurations, keyed by category name.
    pub const COLUMN_CONFIGS: &str = "column_configs";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::RECORDS, cf::COLUMN_CONFIGS]
}
