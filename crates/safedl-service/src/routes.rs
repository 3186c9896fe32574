//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{column_config, columns, health, records, stats};
use crate::state::AppState;

/// Maximum concurrent requests for catalog API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Maximum concurrent column migrations. Each one rewrites a whole category.
const COLUMN_MAX_CONCURRENT_REQUESTS: usize = 4;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `GET /api/stats` - Catalog statistics
/// - `GET /api/records/:category` - List records
/// - `GET /api/column-config/:category` - Column configuration
///
/// ## Admin (bearer token)
/// - `POST /api/records/:category` - Create record
/// - `PATCH /api/records/:category/:id` - Inline edit
/// - `DELETE /api/records/:category/:id` - Delete record
/// - `POST /api/column-config` - Replace a column configuration
/// - `POST /api/columns/:category` - Add column
/// - `PATCH /api/columns/:category/:key` - Rename column
/// - `DELETE /api/columns/:category/:key` - Delete column
/// - `POST /api/admin/columns/add` - Write column fields into records only
/// - `POST /api/admin/columns/delete` - Strip column fields from records only
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // Column migrations touch every record of a category, so they get a
    // tighter limit than plain reads and edits.
    let column_routes = Router::new()
        .route("/:category", post(columns::add_column))
        .route(
            "/:category/:key",
            axum::routing::patch(columns::rename_column).delete(columns::delete_column),
        )
        .layer(ConcurrencyLimitLayer::new(COLUMN_MAX_CONCURRENT_REQUESTS));

    let admin_routes = Router::new()
        .route("/columns/add", post(columns::add_column_fields))
        .route("/columns/delete", post(columns::delete_column_fields))
        .layer(ConcurrencyLimitLayer::new(COLUMN_MAX_CONCURRENT_REQUESTS));

    let api_routes = Router::new()
        // Records
        .route(
            "/records/:category",
            get(records::list_records).post(records::create_record),
        )
        .route(
            "/records/:category/:id",
            axum::routing::patch(records::update_record).delete(records::delete_record),
        )
        // Column configuration
        .route("/column-config", post(column_config::save_column_config))
        .route(
            "/column-config/:category",
            get(column_config::get_column_config),
        )
        // Statistics
        .route("/stats", get(stats::get_stats))
        .nest("/columns", column_routes)
        .nest("/admin", admin_routes)
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no rate limit)
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
