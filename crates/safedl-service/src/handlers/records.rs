//! Software record handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use safedl_core::{CatalogError, Category, FieldValue, RecordId, SoftwareRecord};

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// List the records of a category.
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<SoftwareRecord>>, ApiError> {
    let category: Category = category.parse()?;
    Ok(Json(state.store.list_records(category)?))
}

/// Create record request.
#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    /// Software name.
    pub name: String,
    /// Initial column values; configured columns left out get defaults.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

/// Create a record.
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path(category): Path<String>,
    Json(body): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<SoftwareRecord>), ApiError> {
    let category: Category = category.parse()?;
    let record = state.store.insert_record(category, &body.name, body.fields)?;

    tracing::info!(%category, record_id = %record.id, name = %record.name, "Record created");

    Ok((StatusCode::CREATED, Json(record)))
}

/// Inline edit request.
#[derive(Debug, Deserialize)]
pub struct UpdateRecordRequest {
    /// New name, if changed.
    #[serde(default)]
    pub name: Option<String>,
    /// Changed column values.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

/// Apply an inline edit to a record.
pub async fn update_record(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path((category, id)): Path<(String, String)>,
    Json(body): Json<UpdateRecordRequest>,
) -> Result<Json<SoftwareRecord>, ApiError> {
    let category: Category = category.parse()?;
    let id = parse_record_id(&id)?;
    let field_count = body.fields.len();
    let record = state
        .store
        .update_record(category, &id, body.name, body.fields)?;

    tracing::debug!(%category, record_id = %id, field_count, "Record updated");

    Ok(Json(record))
}

/// Delete record response.
#[derive(Debug, Serialize)]
pub struct DeleteRecordResponse {
    /// Always true.
    pub success: bool,
    /// ID of the deleted record.
    pub id: String,
}

/// Delete a record.
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Path((category, id)): Path<(String, String)>,
) -> Result<Json<DeleteRecordResponse>, ApiError> {
    let category: Category = category.parse()?;
    let id = parse_record_id(&id)?;
    state.store.delete_record(category, &id)?;

    tracing::info!(%category, record_id = %id, "Record deleted");

    Ok(Json(DeleteRecordResponse {
        success: true,
        id: id.to_string(),
    }))
}

fn parse_record_id(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse::<RecordId>()
        .map_err(|e| ApiError::from(CatalogError::from(e)))
}
