//! Dynamic column descriptors and per-category column configuration.
//!
//! A logical column maps to one or more physical record fields:
//!
//! | Type | Physical fields | Defaults |
//! |------|-----------------|----------|
//! | `text`, `email` | `{key}` | `""` |
//! | `number` | `{key}` | `0` |
//! | `url` | `{key}32`, `{key}64`, `{key}Common`, `{key}Show` | `""`, `""`, `""`, `"both"` |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

use crate::category::Category;
use crate::error::{CatalogError, Result};
use crate::record::{is_reserved_field, FieldValue};

/// Suffix of the 32-bit download link field of a `url` column.
pub const URL_32_SUFFIX: &str = "32";
/// Suffix of the 64-bit download link field of a `url` column.
pub const URL_64_SUFFIX: &str = "64";
/// Suffix of the architecture-independent link field of a `url` column.
pub const URL_COMMON_SUFFIX: &str = "Common";
/// Suffix of the display-mode tag field of a `url` column.
pub const URL_SHOW_SUFFIX: &str = "Show";

/// Display-mode tag written into new `url` columns.
pub const DEFAULT_SHOW_TAG: &str = "both";

/// Data type of a logical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text.
    #[default]
    Text,
    /// Numeric value.
    Number,
    /// Email address.
    Email,
    /// Download link group (expands to four physical fields).
    Url,
}

impl ColumnType {
    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Email => "email",
            Self::Url => "url",
        }
    }

    /// Default value for a scalar field of this type.
    #[must_use]
    pub fn default_value(self) -> FieldValue {
        match self {
            Self::Number => FieldValue::from(0),
            Self::Text | Self::Email | Self::Url => FieldValue::empty(),
        }
    }
}

impl FromStr for ColumnType {
    type Err = CatalogError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "email" => Ok(Self::Email),
            "url" => Ok(Self::Url),
            other => Err(CatalogError::InvalidColumnType(other.to_string())),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four physical field names a `url` column expands to.
#[must_use]
pub fn url_fields(key: &str) -> [String; 4] {
    [
        format!("{key}{URL_32_SUFFIX}"),
        format!("{key}{URL_64_SUFFIX}"),
        format!("{key}{URL_COMMON_SUFFIX}"),
        format!("{key}{URL_SHOW_SUFFIX}"),
    ]
}

/// Physical record field names backing a column of the given key and type.
#[must_use]
pub fn physical_fields(key: &str, column_type: ColumnType) -> Vec<String> {
    match column_type {
        ColumnType::Url => url_fields(key).to_vec(),
        ColumnType::Text | ColumnType::Number | ColumnType::Email => vec![key.to_string()],
    }
}

/// Physical fields with their type-appropriate defaults.
#[must_use]
pub fn default_fields(key: &str, column_type: ColumnType) -> Vec<(String, FieldValue)> {
    match column_type {
        ColumnType::Url => {
            let [bit32, bit64, common, show] = url_fields(key);
            vec![
                (bit32, FieldValue::empty()),
                (bit64, FieldValue::empty()),
                (common, FieldValue::empty()),
                (show, FieldValue::from(DEFAULT_SHOW_TAG)),
            ]
        }
        ColumnType::Text | ColumnType::Number | ColumnType::Email => {
            vec![(key.to_string(), column_type.default_value())]
        }
    }
}

/// Base used when a label has no ASCII letters or digits.
const FALLBACK_KEY_BASE: &str = "column";

/// Build a column key from a human label.
///
/// The label is lowercased and every run of characters outside `[a-z0-9]`
/// becomes a single `_`, then a lowercase ULID is appended so keys are never
/// reused, even after deletion. Keys are therefore always `[a-z0-9_]` and
/// safe as URL path segments.
///
/// # Errors
///
/// Returns `CatalogError::Validation` if the label is empty after trimming.
pub fn generate_key(label: &str) -> Result<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(CatalogError::Validation("column label must not be empty".into()));
    }

    let mut base = String::with_capacity(label.len());
    for c in label.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            base.push(c);
        } else if !base.is_empty() && !base.ends_with('_') {
            base.push('_');
        }
    }
    let base = match base.trim_end_matches('_') {
        "" => FALLBACK_KEY_BASE,
        trimmed => trimmed,
    };
    Ok(format!("{base}_{}", Ulid::new().to_string().to_lowercase()))
}

/// Metadata describing one logical table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Unique, immutable key.
    pub key: String,
    /// Display name.
    pub label: String,
    /// Immutable data type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDescriptor {
    /// Create a descriptor with a freshly generated key.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the label is empty after trimming.
    pub fn new(label: &str, column_type: ColumnType) -> Result<Self> {
        let key = generate_key(label)?;
        Ok(Self {
            key,
            label: label.trim().to_string(),
            column_type,
        })
    }

    /// Physical record field names backing this column.
    #[must_use]
    pub fn physical_fields(&self) -> Vec<String> {
        physical_fields(&self.key, self.column_type)
    }

    /// Physical fields with their defaults.
    #[must_use]
    pub fn default_fields(&self) -> Vec<(String, FieldValue)> {
        default_fields(&self.key, self.column_type)
    }

    /// Check that the key is usable and no physical field shadows an identity field.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the key or label is empty or a
    /// physical field is reserved.
    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(CatalogError::Validation("column key must not be empty".into()));
        }
        if self.label.trim().is_empty() {
            return Err(CatalogError::Validation(format!(
                "column {} has an empty label",
                self.key
            )));
        }
        if let Some(field) = self
            .physical_fields()
            .into_iter()
            .find(|field| is_reserved_field(field))
        {
            return Err(CatalogError::Validation(format!(
                "column {} uses reserved field {field}",
                self.key
            )));
        }
        Ok(())
    }

    /// Whether `field` is one of this column's physical fields.
    #[must_use]
    pub fn owns_field(&self, field: &str) -> bool {
        match self.column_type {
            ColumnType::Url => url_fields(&self.key).iter().any(|f| f == field),
            ColumnType::Text | ColumnType::Number | ColumnType::Email => self.key == field,
        }
    }
}

/// Which download links a `url` column shows, from its `{key}Show` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowMode {
    /// 32-bit and 64-bit links.
    #[default]
    Both,
    /// Only the 32-bit link.
    Bit32,
    /// Only the 64-bit link.
    Bit64,
    /// Only the architecture-independent link.
    Common,
}

impl ShowMode {
    /// Parse a show tag. Unrecognised tags fall back to `Both`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "32" => Self::Bit32,
            "64" => Self::Bit64,
            "common" => Self::Common,
            _ => Self::Both,
        }
    }
}

/// Ordered column list of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfiguration {
    /// Owning category.
    pub category: Category,
    /// Columns in rendering order.
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl ColumnConfiguration {
    /// An empty configuration for a category that has never been configured.
    #[must_use]
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            columns: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Build a configuration from a full column list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if a key or label is empty, a
    /// physical field is reserved or a key appears twice.
    pub fn replace(category: Category, columns: Vec<ColumnDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            column.validate()?;
            if !seen.insert(column.key.as_str()) {
                return Err(CatalogError::Validation(format!(
                    "duplicate column key: {}",
                    column.key
                )));
            }
        }
        Ok(Self {
            category,
            columns,
            updated_at: Utc::now(),
        })
    }

    /// Look up a column by key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// The column owning a physical field, if any.
    #[must_use]
    pub fn column_for_field(&self, field: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.owns_field(field))
    }

    /// Append a column.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the column is invalid or its key
    /// is already present.
    pub fn push(&mut self, column: ColumnDescriptor) -> Result<()> {
        column.validate()?;
        if self.find(&column.key).is_some() {
            return Err(CatalogError::Validation(format!(
                "duplicate column key: {}",
                column.key
            )));
        }
        self.columns.push(column);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Change the label of a column; key and type are untouched.
    ///
    /// # Errors
    ///
    /// - `CatalogError::Validation` if the label is empty after trimming.
    /// - `CatalogError::ColumnNotFound` if the key is absent.
    pub fn rename(&mut self, key: &str, label: &str) -> Result<&ColumnDescriptor> {
        let label = label.trim();
        if label.is_empty() {
            return Err(CatalogError::Validation("column label must not be empty".into()));
        }
        let category = self.category;
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.key == key)
            .ok_or_else(|| CatalogError::ColumnNotFound {
                category: category.to_string(),
                key: key.to_string(),
            })?;
        column.label = label.to_string();
        self.updated_at = Utc::now();
        Ok(column)
    }

    /// Remove a column, keeping the order of the remaining ones.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ColumnNotFound` if the key is absent.
    pub fn remove(&mut self, key: &str) -> Result<ColumnDescriptor> {
        let index = self
            .columns
            .iter()
            .position(|c| c.key == key)
            .ok_or_else(|| CatalogError::ColumnNotFound {
                category: self.category.to_string(),
                key: key.to_string(),
            })?;
        self.updated_at = Utc::now();
        Ok(self.columns.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(key: &str, column_type: ColumnType) -> ColumnDescriptor {
        ColumnDescriptor {
            key: key.into(),
            label: key.to_uppercase(),
            column_type,
        }
    }

    #[test]
    fn key_is_derived_from_label() {
        let key = generate_key("  License   Key ").unwrap();
        assert!(key.starts_with("license_key_"), "{key}");
        assert_eq!(key.len(), "license_key_".len() + 26);
        assert_eq!(key, key.to_lowercase());
    }

    #[test]
    fn key_keeps_only_path_safe_characters() {
        for (label, base) in [
            ("TCP/IP", "tcp_ip_"),
            ("C#", "c_"),
            ("  Size (MB) ", "size_mb_"),
            ("a -- b", "a_b_"),
            ("###", "column_"),
            ("Größe", "gr_e_"),
        ] {
            let key = generate_key(label).unwrap();
            assert!(key.starts_with(base), "{label} -> {key}");
            assert!(
                key.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "{label} -> {key}"
            );
        }
    }

    #[test]
    fn same_label_yields_distinct_keys() {
        let a = ColumnDescriptor::new("Mirror", ColumnType::Text).unwrap();
        let b = ColumnDescriptor::new("Mirror", ColumnType::Text).unwrap();
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn blank_label_is_rejected() {
        assert!(matches!(
            ColumnDescriptor::new("   ", ColumnType::Text),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn url_column_expands_to_four_fields() {
        let fields = default_fields("dl", ColumnType::Url);
        assert_eq!(
            fields,
            vec![
                ("dl32".to_string(), FieldValue::empty()),
                ("dl64".to_string(), FieldValue::empty()),
                ("dlCommon".to_string(), FieldValue::empty()),
                ("dlShow".to_string(), FieldValue::from("both")),
            ]
        );
    }

    #[test]
    fn scalar_columns_have_one_field() {
        assert_eq!(
            default_fields("size", ColumnType::Number),
            vec![("size".to_string(), FieldValue::from(0))]
        );
        assert_eq!(
            default_fields("mail", ColumnType::Email),
            vec![("mail".to_string(), FieldValue::empty())]
        );
    }

    #[test]
    fn owns_field_respects_expansion() {
        let url = column("dl", ColumnType::Url);
        assert!(url.owns_field("dl64"));
        assert!(url.owns_field("dlShow"));
        assert!(!url.owns_field("dl"));

        let text = column("notes", ColumnType::Text);
        assert!(text.owns_field("notes"));
        assert!(!text.owns_field("notes32"));
    }

    #[test]
    fn rename_changes_only_label() {
        let mut config = ColumnConfiguration::empty(Category::Tools);
        config.push(column("a", ColumnType::Number)).unwrap();

        let renamed = config.rename("a", " Size (MB) ").unwrap().clone();
        assert_eq!(renamed.key, "a");
        assert_eq!(renamed.label, "Size (MB)");
        assert_eq!(renamed.column_type, ColumnType::Number);
    }

    #[test]
    fn rename_missing_key_fails() {
        let mut config = ColumnConfiguration::empty(Category::Office);
        assert!(matches!(
            config.rename("nope", "x"),
            Err(CatalogError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn remove_preserves_order() {
        let mut config = ColumnConfiguration::empty(Category::Windows);
        for key in ["a", "b", "c"] {
            config.push(column(key, ColumnType::Text)).unwrap();
        }

        let removed = config.remove("b").unwrap();
        assert_eq!(removed.key, "b");
        let keys: Vec<_> = config.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["a", "c"]);

        assert!(matches!(
            config.remove("b"),
            Err(CatalogError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn replace_rejects_duplicates() {
        let result = ColumnConfiguration::replace(
            Category::Tools,
            vec![column("a", ColumnType::Text), column("a", ColumnType::Url)],
        );
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[test]
    fn reserved_fields_cannot_be_columns() {
        for key in ["name", "id", "category", "createdAt", "updatedAt"] {
            let result = ColumnConfiguration::replace(
                Category::Tools,
                vec![column(key, ColumnType::Text)],
            );
            assert!(matches!(result, Err(CatalogError::Validation(_))), "{key}");

            let mut config = ColumnConfiguration::empty(Category::Tools);
            assert!(config.push(column(key, ColumnType::Number)).is_err(), "{key}");
            assert!(config.columns.is_empty());
        }

        // Url columns only occupy the expanded fields, so the bare key is free.
        let config =
            ColumnConfiguration::replace(Category::Tools, vec![column("name", ColumnType::Url)])
                .unwrap();
        assert_eq!(config.columns.len(), 1);
    }

    #[test]
    fn configuration_wire_format() {
        let config =
            ColumnConfiguration::replace(Category::Antivirus, vec![column("dl", ColumnType::Url)])
                .unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["category"], "antivirus");
        assert_eq!(json["columns"][0]["type"], "url");
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn show_mode_tags() {
        assert_eq!(ShowMode::from_tag("both"), ShowMode::Both);
        assert_eq!(ShowMode::from_tag("32"), ShowMode::Bit32);
        assert_eq!(ShowMode::from_tag("64"), ShowMode::Bit64);
        assert_eq!(ShowMode::from_tag("Common"), ShowMode::Common);
        assert_eq!(ShowMode::from_tag(""), ShowMode::Both);
    }
}
