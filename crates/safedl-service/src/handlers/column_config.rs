//! Column configuration handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use safedl_core::{Category, ColumnConfiguration, ColumnDescriptor};

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Get the column configuration of a category.
///
/// A category that was never configured returns an empty column list.
pub async fn get_column_config(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<ColumnConfiguration>, ApiError> {
    let category: Category = category.parse()?;
    Ok(Json(state.store.column_config(category)?))
}

/// Save configuration request (full replacement).
#[derive(Debug, Deserialize)]
pub struct SaveColumnConfigRequest {
    /// Target category.
    pub category: String,
    /// Complete ordered column list.
    pub columns: Vec<ColumnDescriptor>,
}

/// Replace the column configuration of a category. Records are not touched.
pub async fn save_column_config(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Json(body): Json<SaveColumnConfigRequest>,
) -> Result<Json<ColumnConfiguration>, ApiError> {
    let category: Category = body.category.parse()?;
    let config = ColumnConfiguration::replace(category, body.columns)?;
    state.store.put_column_config(&config)?;

    tracing::info!(%category, columns = config.columns.len(), "Column configuration saved");

    Ok(Json(config))
}
