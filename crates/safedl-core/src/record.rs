//! Software records.
//!
//! A record carries fixed identity fields plus an open map of physical
//! column fields. On the wire the open map is flattened into the document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::category::Category;
use crate::column::{ColumnConfiguration, ColumnDescriptor, ColumnType};
use crate::error::{CatalogError, Result};
use crate::ids::RecordId;

/// Identity field names that can never be used as column fields.
pub const RESERVED_FIELDS: [&str; 5] = ["id", "category", "name", "createdAt", "updatedAt"];

/// Whether a field name collides with an identity field.
#[must_use]
pub fn is_reserved_field(field: &str) -> bool {
    RESERVED_FIELDS.contains(&field)
}

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric value.
    Number(serde_json::Number),
    /// Text value.
    Text(String),
}

impl FieldValue {
    /// The empty text value.
    #[must_use]
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Text content, if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Whether this is a numeric value.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Whether this is an empty text value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// One downloadable software entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareRecord {
    /// Record identifier.
    pub id: RecordId,
    /// Owning category.
    pub category: Category,
    /// Software name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Dynamic column fields keyed by physical field name.
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl SoftwareRecord {
    /// Create a record with no column fields.
    #[must_use]
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            category,
            name: name.into(),
            created_at: now,
            updated_at: now,
            fields: BTreeMap::new(),
        }
    }

    /// Get a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Text of a field; absent fields read as empty.
    #[must_use]
    pub fn text(&self, field: &str) -> String {
        self.fields.get(field).map(ToString::to_string).unwrap_or_default()
    }

    /// Insert the given fields where absent. Returns whether anything changed.
    pub fn fill_fields(&mut self, fields: &[(String, FieldValue)]) -> bool {
        let mut changed = false;
        for (name, value) in fields {
            if !self.fields.contains_key(name) {
                self.fields.insert(name.clone(), value.clone());
                changed = true;
            }
        }
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }

    /// Remove the given fields. Returns whether anything changed.
    pub fn strip_fields(&mut self, fields: &[String]) -> bool {
        let mut changed = false;
        for name in fields {
            changed |= self.fields.remove(name).is_some();
        }
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }

    /// Make sure the record exposes every physical field of `column`.
    pub fn apply_column(&mut self, column: &ColumnDescriptor) -> bool {
        self.fill_fields(&column.default_fields())
    }

    /// Remove every physical field of `column`.
    pub fn strip_column(&mut self, column: &ColumnDescriptor) -> bool {
        self.strip_fields(&column.physical_fields())
    }

    /// Apply an inline edit checked against the category configuration.
    ///
    /// Nothing is modified unless every field is valid.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the name is blank, a field does
    /// not belong to a configured column, or a value has the wrong type.
    pub fn apply_patch(
        &mut self,
        config: &ColumnConfiguration,
        name: Option<String>,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<()> {
        if let Some(name) = &name {
            if name.trim().is_empty() {
                return Err(CatalogError::Validation("name must not be empty".into()));
            }
        }
        for (field, value) in &fields {
            check_field(config, field, value)?;
        }

        if let Some(name) = name {
            self.name = name.trim().to_string();
        }
        self.fields.extend(fields);
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Check that `field` belongs to a configured column and `value` fits its type.
fn check_field(config: &ColumnConfiguration, field: &str, value: &FieldValue) -> Result<()> {
    if is_reserved_field(field) {
        return Err(CatalogError::Validation(format!("field {field} is reserved")));
    }
    let column = config.column_for_field(field).ok_or_else(|| {
        CatalogError::Validation(format!(
            "unknown field {field} for category {}",
            config.category
        ))
    })?;
    let wants_number = column.column_type == ColumnType::Number;
    if wants_number != value.is_number() {
        return Err(CatalogError::Validation(format!(
            "field {field} expects a {} value",
            if wants_number { "number" } else { "text" }
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(columns: Vec<ColumnDescriptor>) -> ColumnConfiguration {
        ColumnConfiguration::replace(Category::Tools, columns).unwrap()
    }

    fn descriptor(key: &str, column_type: ColumnType) -> ColumnDescriptor {
        ColumnDescriptor {
            key: key.into(),
            label: key.into(),
            column_type,
        }
    }

    #[test]
    fn fields_flatten_into_document() {
        let mut record = SoftwareRecord::new(Category::Tools, "7-Zip");
        record.fields.insert("size".into(), FieldValue::from(2));
        record.fields.insert("dl32".into(), FieldValue::from("7-zip.org"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "7-Zip");
        assert_eq!(json["size"], 2);
        assert_eq!(json["dl32"], "7-zip.org");
        assert_eq!(json["category"], "tools");

        let back: SoftwareRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn apply_column_keeps_existing_values() {
        let column = descriptor("dl", ColumnType::Url);
        let mut record = SoftwareRecord::new(Category::Windows, "Win11");
        record.fields.insert("dl64".into(), FieldValue::from("x.iso"));

        assert!(record.apply_column(&column));
        assert_eq!(record.text("dl64"), "x.iso");
        assert_eq!(record.text("dlShow"), "both");
        assert_eq!(record.fields.len(), 4);

        assert!(!record.apply_column(&column));
    }

    #[test]
    fn strip_column_removes_all_expanded_fields() {
        let column = descriptor("dl", ColumnType::Url);
        let mut record = SoftwareRecord::new(Category::Windows, "Win10");
        record.apply_column(&column);
        record.fields.insert("other".into(), FieldValue::empty());

        assert!(record.strip_column(&column));
        assert_eq!(record.fields.keys().collect::<Vec<_>>(), ["other"]);
    }

    #[test]
    fn patch_checks_types() {
        let config = config_with(vec![
            descriptor("size", ColumnType::Number),
            descriptor("dl", ColumnType::Url),
        ]);
        let mut record = SoftwareRecord::new(Category::Tools, "Rufus");

        let bad = BTreeMap::from([("size".to_string(), FieldValue::from("big"))]);
        assert!(record.apply_patch(&config, None, bad).is_err());

        let unknown = BTreeMap::from([("dl".to_string(), FieldValue::from("x"))]);
        assert!(record.apply_patch(&config, None, unknown).is_err());

        let good = BTreeMap::from([
            ("size".to_string(), FieldValue::from(12)),
            ("dlCommon".to_string(), FieldValue::from("rufus.ie")),
        ]);
        record
            .apply_patch(&config, Some("Rufus 4".into()), good)
            .unwrap();
        assert_eq!(record.name, "Rufus 4");
        assert_eq!(record.get("size"), Some(&FieldValue::from(12)));
        assert_eq!(record.text("dlCommon"), "rufus.ie");
    }

    #[test]
    fn failed_patch_leaves_record_untouched() {
        let config = config_with(vec![descriptor("notes", ColumnType::Text)]);
        let mut record = SoftwareRecord::new(Category::Office, "Office 2021");
        let before = record.clone();

        let fields = BTreeMap::from([
            ("notes".to_string(), FieldValue::from("ok")),
            ("ghost".to_string(), FieldValue::from("x")),
        ]);
        assert!(record.apply_patch(&config, None, fields).is_err());
        assert_eq!(record, before);
    }

    #[test]
    fn patch_never_writes_identity_fields() {
        // A configuration stored before reserved keys were refused.
        let config = ColumnConfiguration {
            category: Category::Tools,
            columns: vec![descriptor("name", ColumnType::Text)],
            updated_at: Utc::now(),
        };
        let mut record = SoftwareRecord::new(Category::Tools, "Rufus");
        let before = record.clone();

        let fields = BTreeMap::from([("name".to_string(), FieldValue::from("HIJACK"))]);
        assert!(matches!(
            record.apply_patch(&config, None, fields),
            Err(CatalogError::Validation(_))
        ));
        assert_eq!(record, before);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json.matches("\"name\"").count(), 1);
    }

    #[test]
    fn reserved_fields() {
        assert!(is_reserved_field("name"));
        assert!(is_reserved_field("createdAt"));
        assert!(!is_reserved_field("license_key"));
    }
}
