//! Request and response types for the safedl client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use safedl_core::{ColumnConfiguration, ColumnDescriptor, ColumnType, FieldValue};

/// Service health.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Service status (`ok`).
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Whether admin routes accept requests.
    pub admin_enabled: bool,
}

/// New record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewRecord {
    /// Software name.
    pub name: String,
    /// Initial column values.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldValue>,
}

impl NewRecord {
    /// A record with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }
}

/// Inline edit of a record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordPatch {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Changed column values.
    pub fields: BTreeMap<String, FieldValue>,
}

impl RecordPatch {
    /// Patch a single field.
    #[must_use]
    pub fn field(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: None,
            fields: BTreeMap::from([(field.into(), value.into())]),
        }
    }
}

/// Delete record response.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRecordResponse {
    /// Always true.
    pub success: bool,
    /// ID of the deleted record.
    pub id: String,
}

/// Add column request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AddColumnRequest<'a> {
    pub label: &'a str,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// Rename column request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RenameColumnRequest<'a> {
    pub label: &'a str,
}

/// Result of a column add, rename or delete.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMutationResponse {
    /// The affected column.
    pub column: ColumnDescriptor,
    /// The configuration after the change.
    pub configuration: ColumnConfiguration,
    /// Number of records rewritten.
    pub records_updated: usize,
}

/// Configuration replacement request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SaveColumnConfigRequest<'a> {
    pub category: &'a str,
    pub columns: &'a [ColumnDescriptor],
}

/// Record-only field add request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddColumnFieldsRequest<'a> {
    pub category: &'a str,
    pub column_key: &'a str,
    pub column_type: ColumnType,
}

/// Record-only field delete request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteColumnFieldsRequest<'a> {
    pub category: &'a str,
    pub column_key: &'a str,
    pub is_url_column: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_fields: Option<&'a [String]>,
}

/// Response of the record-only field endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMutationResponse {
    /// Always true.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Number of records rewritten.
    pub records_updated: usize,
}

/// API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorBody,
}

/// API error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Additional details.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
