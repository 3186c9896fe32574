//! Column mutation handlers.
//!
//! The `/api/columns` routes change records and configuration in one store
//! transaction. The `/api/admin/columns` routes only reshape records and are
//! kept for clients that save the configuration in a separate request.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use safedl_core::{
    default_fields, is_reserved_field, url_fields, Category, ColumnConfiguration,
    ColumnDescriptor, ColumnType,
};
use safedl_store::ColumnMutation;

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Response to a column add, rename or delete.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMutationResponse {
    /// The affected column.
    pub column: ColumnDescriptor,
    /// The configuration after the change.
    pub configuration: ColumnConfiguration,
    /// Number of records rewritten.
    pub records_updated: usize,
}

impl From<ColumnMutation> for ColumnMutationResponse {
    fn from(mutation: ColumnMutation) -> Self {
        Self {
            column: mutation.column,
            configuration: mutation.configuration,
            records_updated: mutation.records_updated,
        }
    }
}

/// Add column request.
#[derive(Debug, Deserialize)]
pub struct AddColumnRequest {
    /// Display name; the key is derived from it.
    pub label: String,
    /// Column type (default: text).
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
}

/// Add a column to every record of a category and to its configuration.
pub async fn add_column(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path(category): Path<String>,
    Json(body): Json<AddColumnRequest>,
) -> Result<Json<ColumnMutationResponse>, ApiError> {
    let category: Category = category.parse()?;
    let column = ColumnDescriptor::new(&body.label, body.column_type)?;
    let mutation = state.store.add_column(category, column)?;

    tracing::info!(
        %category,
        key = %mutation.column.key,
        column_type = %mutation.column.column_type,
        records_updated = mutation.records_updated,
        "Column added"
    );

    Ok(Json(mutation.into()))
}

/// Rename column request.
#[derive(Debug, Deserialize)]
pub struct RenameColumnRequest {
    /// New display name.
    pub label: String,
}

/// Change a column label.
pub async fn rename_column(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path((category, key)): Path<(String, String)>,
    Json(body): Json<RenameColumnRequest>,
) -> Result<Json<ColumnMutationResponse>, ApiError> {
    let category: Category = category.parse()?;
    let mutation = state.store.rename_column(category, &key, &body.label)?;

    tracing::info!(%category, %key, label = %mutation.column.label, "Column renamed");

    Ok(Json(mutation.into()))
}

/// Remove a column from every record of a category and from its configuration.
pub async fn delete_column(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path((category, key)): Path<(String, String)>,
) -> Result<Json<ColumnMutationResponse>, ApiError> {
    let category: Category = category.parse()?;
    let mutation = state.store.delete_column(category, &key)?;

    tracing::info!(
        %category,
        %key,
        records_updated = mutation.records_updated,
        "Column deleted"
    );

    Ok(Json(mutation.into()))
}

// ============================================================================
// Record-only field endpoints
// ============================================================================

/// Response of the record-only field endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMutationResponse {
    /// Always true.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Number of records rewritten.
    pub records_updated: usize,
}

/// Add record fields request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddColumnFieldsRequest {
    /// Target category.
    pub category: String,
    /// Column key whose fields are written.
    pub column_key: String,
    /// Column type (default: text).
    #[serde(default)]
    pub column_type: ColumnType,
}

/// Write a column's default fields into every record, without touching the configuration.
pub async fn add_column_fields(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Json(body): Json<AddColumnFieldsRequest>,
) -> Result<Json<FieldMutationResponse>, ApiError> {
    let category: Category = body.category.parse()?;
    let key = validate_column_key(&body.column_key)?;

    let fields = default_fields(key, body.column_type);
    let records_updated = state.store.add_record_fields(category, &fields)?;

    tracing::info!(%category, %key, records_updated, "Column fields added to records");

    Ok(Json(FieldMutationResponse {
        success: true,
        message: format!("Added column {key} to {records_updated} {category} records"),
        records_updated,
    }))
}

/// Delete record fields request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteColumnFieldsRequest {
    /// Target category.
    pub category: String,
    /// Column key whose fields are removed.
    pub column_key: String,
    /// Whether the column is a url column.
    #[serde(default)]
    pub is_url_column: bool,
    /// Expanded url fields; derived from the key when omitted.
    #[serde(default)]
    pub url_fields: Option<Vec<String>>,
}

/// Strip a column's fields from every record, without touching the configuration.
pub async fn delete_column_fields(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Json(body): Json<DeleteColumnFieldsRequest>,
) -> Result<Json<FieldMutationResponse>, ApiError> {
    let category: Category = body.category.parse()?;
    let key = validate_column_key(&body.column_key)?;

    let mut fields = vec![key.to_string()];
    if body.is_url_column {
        match body.url_fields {
            Some(extra) => fields.extend(extra),
            None => fields.extend(url_fields(key)),
        }
    }
    if let Some(reserved) = fields.iter().find(|f| is_reserved_field(f)) {
        return Err(ApiError::BadRequest(format!("{reserved} is not a column field")));
    }

    let records_updated = state.store.remove_record_fields(category, &fields)?;

    tracing::info!(
        %category,
        %key,
        field_count = fields.len(),
        records_updated,
        "Column fields removed from records"
    );

    Ok(Json(FieldMutationResponse {
        success: true,
        message: format!("Removed column {key} from {records_updated} {category} records"),
        records_updated,
    }))
}

fn validate_column_key(raw: &str) -> Result<&str, ApiError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(ApiError::BadRequest("columnKey must not be empty".into()));
    }
    if is_reserved_field(key) {
        return Err(ApiError::BadRequest(format!("{key} is not a column field")));
    }
    Ok(key)
}
