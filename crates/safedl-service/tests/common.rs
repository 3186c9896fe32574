//! Common test utilities for safedl integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};

use safedl_service::{create_router, AppState, ServiceConfig};
use safedl_store::MemoryStore;

/// Admin key accepted by the harness.
pub const ADMIN_KEY: &str = "test-admin-key";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
}

impl TestHarness {
    /// Create a new test harness with an empty in-memory catalog.
    pub fn new() -> Self {
        Self::with_admin_key(Some(ADMIN_KEY.to_string()))
    }

    /// Create a harness whose admin routes are closed.
    pub fn without_admin_key() -> Self {
        Self::with_admin_key(None)
    }

    fn with_admin_key(admin_api_key: Option<String>) -> Self {
        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: "unused".into(),
            admin_api_key,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::new(MemoryStore::new()), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server }
    }

    /// Authorization header name.
    pub fn auth_header_name() -> HeaderName {
        axum::http::header::AUTHORIZATION
    }

    /// Get the authorization header for admin requests.
    pub fn admin_auth_header() -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {ADMIN_KEY}")).expect("valid header")
    }

    /// Create a record through the API and return its JSON.
    pub async fn create_record(&self, category: &str, name: &str, fields: Value) -> Value {
        let response = self
            .server
            .post(&format!("/api/records/{category}"))
            .add_header(Self::auth_header_name(), Self::admin_auth_header())
            .json(&json!({ "name": name, "fields": fields }))
            .await;
        assert_eq!(response.status_code(), axum::http::StatusCode::CREATED);
        response.json()
    }

    /// Add a column through the API and return the mutation JSON.
    pub async fn add_column(&self, category: &str, label: &str, column_type: &str) -> Value {
        let response = self
            .server
            .post(&format!("/api/columns/{category}"))
            .add_header(Self::auth_header_name(), Self::admin_auth_header())
            .json(&json!({ "label": label, "type": column_type }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    /// List the records of a category.
    pub async fn list_records(&self, category: &str) -> Vec<Value> {
        let response = self.server.get(&format!("/api/records/{category}")).await;
        response.assert_status_ok();
        response.json()
    }

    /// Fetch the column configuration of a category.
    pub async fn column_config(&self, category: &str) -> Value {
        let response = self
            .server
            .get(&format!("/api/column-config/{category}"))
            .await;
        response.assert_status_ok();
        response.json()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
