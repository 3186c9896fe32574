//! Column migrations across a category's records.
//!
//! Backends load the current configuration and records, let these functions
//! compute the complete new state, then commit the result in one write. The
//! functions never touch storage themselves, so a rejected change (missing
//! key, reserved key, invalid input) leaves both stores as they were.

use std::collections::BTreeMap;

use safedl_core::{
    generate_key, ColumnConfiguration, ColumnDescriptor, FieldValue, SoftwareRecord,
};

use crate::error::{Result, StoreError};

/// Outcome of a column add, rename or delete.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMutation {
    /// The column that was added, renamed or deleted.
    pub column: ColumnDescriptor,
    /// The category configuration after the change.
    pub configuration: ColumnConfiguration,
    /// Number of records whose fields were rewritten.
    pub records_updated: usize,
}

/// Full new state produced by a migration.
#[derive(Debug)]
pub(crate) struct MigrationPlan {
    pub mutation: ColumnMutation,
    /// Only the records that changed.
    pub records: Vec<SoftwareRecord>,
}

/// Give every record the given fields where they are absent.
///
/// Returns the records that changed.
pub(crate) fn fill_all(
    records: impl IntoIterator<Item = SoftwareRecord>,
    fields: &[(String, FieldValue)],
) -> Vec<SoftwareRecord> {
    records
        .into_iter()
        .filter_map(|mut record| record.fill_fields(fields).then_some(record))
        .collect()
}

/// Remove the given fields from every record.
///
/// Returns the records that changed.
pub(crate) fn strip_all(
    records: impl IntoIterator<Item = SoftwareRecord>,
    fields: &[String],
) -> Vec<SoftwareRecord> {
    records
        .into_iter()
        .filter_map(|mut record| record.strip_fields(fields).then_some(record))
        .collect()
}

/// Append `column` and write its defaults into every record.
///
/// A key already present in the configuration is replaced by a fresh one
/// generated from the label.
pub(crate) fn plan_add(
    mut configuration: ColumnConfiguration,
    records: impl IntoIterator<Item = SoftwareRecord>,
    mut column: ColumnDescriptor,
) -> Result<MigrationPlan> {
    column.validate()?;
    while configuration.find(&column.key).is_some() {
        let key = generate_key(&column.label)?;
        tracing::debug!(taken = %column.key, %key, "Column key in use - drew a new one");
        column.key = key;
    }

    let records = fill_all(records, &column.default_fields());
    configuration.push(column.clone())?;

    Ok(MigrationPlan {
        mutation: ColumnMutation {
            column,
            records_updated: records.len(),
            configuration,
        },
        records,
    })
}

/// Relabel a column. Records are untouched.
pub(crate) fn plan_rename(
    mut configuration: ColumnConfiguration,
    key: &str,
    label: &str,
) -> Result<MigrationPlan> {
    let column = configuration.rename(key, label)?.clone();
    Ok(MigrationPlan {
        mutation: ColumnMutation {
            column,
            configuration,
            records_updated: 0,
        },
        records: Vec::new(),
    })
}

/// Remove a column and strip its physical fields from every record.
pub(crate) fn plan_delete(
    mut configuration: ColumnConfiguration,
    records: impl IntoIterator<Item = SoftwareRecord>,
    key: &str,
) -> Result<MigrationPlan> {
    let column = configuration.remove(key)?;
    let records = strip_all(records, &column.physical_fields());

    Ok(MigrationPlan {
        mutation: ColumnMutation {
            column,
            records_updated: records.len(),
            configuration,
        },
        records,
    })
}

/// Build a new record exposing every configured column.
pub(crate) fn new_record(
    configuration: &ColumnConfiguration,
    name: &str,
    fields: BTreeMap<String, FieldValue>,
) -> Result<SoftwareRecord> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("name must not be empty".into()));
    }
    let mut record = SoftwareRecord::new(configuration.category, name);
    record.apply_patch(configuration, None, fields)?;
    for column in &configuration.columns {
        record.apply_column(column);
    }
    record.updated_at = record.created_at;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use safedl_core::{Category, ColumnType};

    fn records(n: usize) -> Vec<SoftwareRecord> {
        (0..n)
            .map(|i| SoftwareRecord::new(Category::Tools, format!("tool-{i}")))
            .collect()
    }

    #[test]
    fn add_touches_every_record() {
        let config = ColumnConfiguration::empty(Category::Tools);
        let column = ColumnDescriptor::new("License Key", ColumnType::Text).unwrap();

        let plan = plan_add(config, records(3), column.clone()).unwrap();

        assert_eq!(plan.mutation.records_updated, 3);
        assert_eq!(plan.mutation.configuration.columns.last(), Some(&column));
        for record in &plan.records {
            assert_eq!(record.get(&column.key), Some(&FieldValue::empty()));
        }
    }

    #[test]
    fn add_draws_new_key_on_collision() {
        let column = ColumnDescriptor::new("Size", ColumnType::Number).unwrap();
        let config =
            ColumnConfiguration::replace(Category::Tools, vec![column.clone()]).unwrap();

        let plan = plan_add(config, records(1), column.clone()).unwrap();

        let added = &plan.mutation.column;
        assert_ne!(added.key, column.key);
        assert!(added.key.starts_with("size_"), "{}", added.key);
        assert_eq!(added.label, "Size");
        assert_eq!(plan.mutation.configuration.columns.len(), 2);
        assert_eq!(plan.records[0].get(&added.key), Some(&FieldValue::from(0)));
        assert!(plan.records[0].get(&column.key).is_none());
    }

    #[test]
    fn add_rejects_reserved_key() {
        let column = ColumnDescriptor {
            key: "name".into(),
            label: "Name".into(),
            column_type: ColumnType::Text,
        };
        let err = plan_add(ColumnConfiguration::empty(Category::Tools), records(1), column)
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn delete_missing_key_is_not_found() {
        let config = ColumnConfiguration::empty(Category::Office);
        let err = plan_delete(config, records(2), "ghost").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "column", .. }));
    }

    #[test]
    fn delete_strips_url_fields() {
        let column = ColumnDescriptor::new("Download", ColumnType::Url).unwrap();
        let config =
            ColumnConfiguration::replace(Category::Windows, vec![column.clone()]).unwrap();
        let mut rows = records(2);
        for row in &mut rows {
            row.apply_column(&column);
        }

        let plan = plan_delete(config, rows, &column.key).unwrap();

        assert!(plan.mutation.configuration.columns.is_empty());
        assert_eq!(plan.mutation.records_updated, 2);
        assert!(plan.records.iter().all(|r| r.fields.is_empty()));
    }

    #[test]
    fn new_record_has_all_defaults() {
        let size = ColumnDescriptor::new("Size", ColumnType::Number).unwrap();
        let link = ColumnDescriptor::new("Link", ColumnType::Url).unwrap();
        let config =
            ColumnConfiguration::replace(Category::Tools, vec![size.clone(), link]).unwrap();

        let fields = BTreeMap::from([(size.key.clone(), FieldValue::from(42))]);
        let record = new_record(&config, " CPU-Z ", fields).unwrap();

        assert_eq!(record.name, "CPU-Z");
        assert_eq!(record.get(&size.key), Some(&FieldValue::from(42)));
        assert_eq!(record.fields.len(), 5);
    }

    #[test]
    fn new_record_requires_name() {
        let config = ColumnConfiguration::empty(Category::Tools);
        assert!(new_record(&config, "  ", BTreeMap::new()).is_err());
    }
}
