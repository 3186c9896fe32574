//! Catalog statistics handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use safedl_core::{CatalogStats, Category, CategoryBreakdown};

use crate::error::ApiError;
use crate::state::AppState;

/// Get aggregate statistics across all categories.
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<CatalogStats>, ApiError> {
    let mut breakdown = CategoryBreakdown::default();
    for category in Category::ALL {
        breakdown.set(category, state.store.count_records(category)?);
    }

    let stats = CatalogStats::from_breakdown(breakdown);
    tracing::debug!(
        total_software = stats.total_software,
        safety_percentage = stats.safety_percentage,
        "Statistics calculated"
    );

    Ok(Json(stats))
}
