//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in column families.

use safedl_core::{Category, RecordId};

/// Create a record key.
///
/// Format: `category_tag (1 byte) || record_id (16 bytes)`
///
/// Since ULIDs are time-ordered, records of a category sort by creation time.
#[must_use]
pub fn record_key(category: Category, id: &RecordId) -> Vec<u8> {
    let mut key = Vec::with_capacity(17);
    key.push(category.tag());
    key.extend_from_slice(&id.to_bytes());
    key
}

/// Create a prefix for iterating all records of a category.
#[must_use]
pub fn record_prefix(category: Category) -> Vec<u8> {
    vec![category.tag()]
}

/// Create a column configuration key.
#[must_use]
pub fn column_config_key(category: Category) -> Vec<u8> {
    category.as_str().as_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_format() {
        let id = RecordId::generate();
        let key = record_key(Category::Office, &id);

        assert_eq!(key.len(), 17);
        assert_eq!(key[0], Category::Office.tag());
        assert_eq!(&key[1..], id.to_bytes());
        assert!(key.starts_with(&record_prefix(Category::Office)));
        assert!(!key.starts_with(&record_prefix(Category::Tools)));
    }

    #[test]
    fn config_key_is_category_name() {
        assert_eq!(column_config_key(Category::Windows), b"windows");
    }
}
