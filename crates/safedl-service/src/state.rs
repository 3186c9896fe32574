//! Application state.

use std::sync::Arc;

use safedl_store::Store;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        if config.admin_api_key.is_none() {
            tracing::warn!("ADMIN_API_KEY not configured - admin routes will reject every request");
        }

        Self { store, config }
    }

    /// Check if admin routes can be used.
    #[must_use]
    pub fn has_admin_key(&self) -> bool {
        self.config.admin_api_key.is_some()
    }
}
