//! In-memory storage implementation.
//!
//! Everything sits behind one mutex, so each trait call, including the
//! compound column operations, is applied as a single unit.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use safedl_core::{
    Category, ColumnConfiguration, ColumnDescriptor, FieldValue, RecordId, SoftwareRecord,
};

use crate::error::{Result, StoreError};
use crate::migration::{self, ColumnMutation, MigrationPlan};
use crate::Store;

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<Category, BTreeMap<RecordId, SoftwareRecord>>,
    configs: HashMap<Category, ColumnConfiguration>,
}

impl Inner {
    fn config(&self, category: Category) -> ColumnConfiguration {
        self.configs
            .get(&category)
            .cloned()
            .unwrap_or_else(|| ColumnConfiguration::empty(category))
    }

    fn records(&self, category: Category) -> impl Iterator<Item = SoftwareRecord> + '_ {
        self.records
            .get(&category)
            .into_iter()
            .flat_map(|rows| rows.values().cloned())
    }

    fn store_records(&mut self, category: Category, records: Vec<SoftwareRecord>) {
        let rows = self.records.entry(category).or_default();
        for record in records {
            rows.insert(record.id, record);
        }
    }

    fn commit(&mut self, category: Category, plan: MigrationPlan) -> ColumnMutation {
        self.store_records(category, plan.records);
        self.configs
            .insert(category, plan.mutation.configuration.clone());
        plan.mutation
    }
}

/// Memory-backed storage implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Database("memory store lock poisoned".into()))
    }
}

impl Store for MemoryStore {
    fn insert_record(
        &self,
        category: Category,
        name: &str,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<SoftwareRecord> {
        let mut inner = self.lock()?;
        let record = migration::new_record(&inner.config(category), name, fields)?;
        inner.store_records(category, vec![record.clone()]);
        Ok(record)
    }

    fn update_record(
        &self,
        category: Category,
        id: &RecordId,
        name: Option<String>,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<SoftwareRecord> {
        let mut inner = self.lock()?;
        let config = inner.config(category);
        let record = inner
            .records
            .get_mut(&category)
            .and_then(|rows| rows.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                entity: "record",
                id: id.to_string(),
            })?;
        record.apply_patch(&config, name, fields)?;
        Ok(record.clone())
    }

    fn get_record(&self, category: Category, id: &RecordId) -> Result<Option<SoftwareRecord>> {
        let inner = self.lock()?;
        Ok(inner
            .records
            .get(&category)
            .and_then(|rows| rows.get(id))
            .cloned())
    }

    fn delete_record(&self, category: Category, id: &RecordId) -> Result<()> {
        let mut inner = self.lock()?;
        inner
            .records
            .get_mut(&category)
            .and_then(|rows| rows.remove(id))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                entity: "record",
                id: id.to_string(),
            })
    }

    fn list_records(&self, category: Category) -> Result<Vec<SoftwareRecord>> {
        Ok(self.lock()?.records(category).collect())
    }

    fn count_records(&self, category: Category) -> Result<u64> {
        let inner = self.lock()?;
        Ok(inner.records.get(&category).map_or(0, |rows| rows.len() as u64))
    }

    fn add_record_fields(
        &self,
        category: Category,
        fields: &[(String, FieldValue)],
    ) -> Result<usize> {
        let mut inner = self.lock()?;
        let changed = migration::fill_all(inner.records(category), fields);
        let count = changed.len();
        inner.store_records(category, changed);
        Ok(count)
    }

    fn remove_record_fields(&self, category: Category, fields: &[String]) -> Result<usize> {
        let mut inner = self.lock()?;
        let changed = migration::strip_all(inner.records(category), fields);
        let count = changed.len();
        inner.store_records(category, changed);
        Ok(count)
    }

    fn get_column_config(&self, category: Category) -> Result<Option<ColumnConfiguration>> {
        Ok(self.lock()?.configs.get(&category).cloned())
    }

    fn put_column_config(&self, config: &ColumnConfiguration) -> Result<()> {
        self.lock()?.configs.insert(config.category, config.clone());
        Ok(())
    }

    fn add_column(&self, category: Category, column: ColumnDescriptor) -> Result<ColumnMutation> {
        let mut inner = self.lock()?;
        let plan = migration::plan_add(inner.config(category), inner.records(category), column)?;
        Ok(inner.commit(category, plan))
    }

    fn rename_column(&self, category: Category, key: &str, label: &str) -> Result<ColumnMutation> {
        let mut inner = self.lock()?;
        let plan = migration::plan_rename(inner.config(category), key, label)?;
        Ok(inner.commit(category, plan))
    }

    fn delete_column(&self, category: Category, key: &str) -> Result<ColumnMutation> {
        let mut inner = self.lock()?;
        let plan = migration::plan_delete(inner.config(category), inner.records(category), key)?;
        Ok(inner.commit(category, plan))
    }
}
