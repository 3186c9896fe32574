//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.
//! Compound column operations stage every rewritten record and the new
//! configuration into one `WriteBatch`, and run under a writer mutex so two
//! mutations of the same store cannot interleave their read-modify-write.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use safedl_core::{
    Category, ColumnConfiguration, ColumnDescriptor, FieldValue, RecordId, SoftwareRecord,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::migration::{self, ColumnMutation, MigrationPlan};
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    writer: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            writer: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize writers of compound operations.
    fn write_guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|_| StoreError::Database("writer lock poisoned".into()))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Write one record.
    fn put_record(&self, record: &SoftwareRecord) -> Result<()> {
        let cf = self.cf(cf::RECORDS)?;
        let key = keys::record_key(record.category, &record.id);
        let value = Self::serialize(record)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Stage record rewrites and optionally a configuration into one batch.
    fn write_batch(
        &self,
        records: &[SoftwareRecord],
        config: Option<&ColumnConfiguration>,
    ) -> Result<()> {
        let cf_records = self.cf(cf::RECORDS)?;
        let cf_configs = self.cf(cf::COLUMN_CONFIGS)?;

        let mut batch = WriteBatch::default();
        for record in records {
            let key = keys::record_key(record.category, &record.id);
            batch.put_cf(&cf_records, key, Self::serialize(record)?);
        }
        if let Some(config) = config {
            let key = keys::column_config_key(config.category);
            batch.put_cf(&cf_configs, key, Self::serialize(config)?);
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Commit a migration plan atomically.
    fn commit(&self, plan: MigrationPlan) -> Result<ColumnMutation> {
        self.write_batch(&plan.records, Some(&plan.mutation.configuration))?;
        tracing::debug!(
            category = %plan.mutation.configuration.category,
            column = %plan.mutation.column.key,
            records_updated = plan.mutation.records_updated,
            "Column migration committed"
        );
        Ok(plan.mutation)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Record Operations
    // =========================================================================

    fn insert_record(
        &self,
        category: Category,
        name: &str,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<SoftwareRecord> {
        let _guard = self.write_guard()?;
        let config = self.column_config(category)?;
        let record = migration::new_record(&config, name, fields)?;
        self.put_record(&record)?;
        Ok(record)
    }

    fn update_record(
        &self,
        category: Category,
        id: &RecordId,
        name: Option<String>,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<SoftwareRecord> {
        let _guard = self.write_guard()?;
        let config = self.column_config(category)?;
        let mut record = self
            .get_record(category, id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "record",
                id: id.to_string(),
            })?;
        record.apply_patch(&config, name, fields)?;
        self.put_record(&record)?;
        Ok(record)
    }

    fn get_record(&self, category: Category, id: &RecordId) -> Result<Option<SoftwareRecord>> {
        let cf = self.cf(cf::RECORDS)?;
        let key = keys::record_key(category, id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn delete_record(&self, category: Category, id: &RecordId) -> Result<()> {
        let _guard = self.write_guard()?;
        let cf = self.cf(cf::RECORDS)?;
        let key = keys::record_key(category, id);

        // Check if record exists
        if self.get_record(category, id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "record",
                id: id.to_string(),
            });
        }

        self.db
            .delete_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn list_records(&self, category: Category) -> Result<Vec<SoftwareRecord>> {
        let cf = self.cf(cf::RECORDS)?;
        let prefix = keys::record_prefix(category);

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut records = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            records.push(Self::deserialize(&value)?);
        }

        Ok(records)
    }

    fn count_records(&self, category: Category) -> Result<u64> {
        let cf = self.cf(cf::RECORDS)?;
        let prefix = keys::record_prefix(category);

        let mut count = 0;
        for item in self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward))
        {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            count += 1;
        }

        Ok(count)
    }

    // =========================================================================
    // Record Field Operations
    // =========================================================================

    fn add_record_fields(
        &self,
        category: Category,
        fields: &[(String, FieldValue)],
    ) -> Result<usize> {
        let _guard = self.write_guard()?;
        let changed = migration::fill_all(self.list_records(category)?, fields);
        self.write_batch(&changed, None)?;
        Ok(changed.len())
    }

    fn remove_record_fields(&self, category: Category, fields: &[String]) -> Result<usize> {
        let _guard = self.write_guard()?;
        let changed = migration::strip_all(self.list_records(category)?, fields);
        self.write_batch(&changed, None)?;
        Ok(changed.len())
    }

    // =========================================================================
    // Column Configuration Operations
    // =========================================================================

    fn get_column_config(&self, category: Category) -> Result<Option<ColumnConfiguration>> {
        let cf = self.cf(cf::COLUMN_CONFIGS)?;
        let key = keys::column_config_key(category);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn put_column_config(&self, config: &ColumnConfiguration) -> Result<()> {
        let _guard = self.write_guard()?;
        self.write_batch(&[], Some(config))
    }

    // =========================================================================
    // Compound Column Operations
    // =========================================================================

    fn add_column(&self, category: Category, column: ColumnDescriptor) -> Result<ColumnMutation> {
        let _guard = self.write_guard()?;
        let plan = migration::plan_add(
            self.column_config(category)?,
            self.list_records(category)?,
            column,
        )?;
        self.commit(plan)
    }

    fn rename_column(&self, category: Category, key: &str, label: &str) -> Result<ColumnMutation> {
        let _guard = self.write_guard()?;
        let plan = migration::plan_rename(self.column_config(category)?, key, label)?;
        self.commit(plan)
    }

    fn delete_column(&self, category: Category, key: &str) -> Result<ColumnMutation> {
        let _guard = self.write_guard()?;
        let plan = migration::plan_delete(
            self.column_config(category)?,
            self.list_records(category)?,
            key,
        )?;
        self.commit(plan)
    }
}
