//! Admin authentication extractor.
//!
//! Token issuance lives outside this service; admin routes only check the
//! bearer token against the configured `ADMIN_API_KEY`.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// An authenticated admin caller.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

#[async_trait::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Extract the Authorization header
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        // Extract the Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        // Validate against configured admin API key
        let expected_key = state
            .config
            .admin_api_key
            .as_deref()
            .ok_or(ApiError::Unauthorized)?;

        if token != expected_key {
            tracing::warn!("Rejected admin request with invalid token");
            return Err(ApiError::Unauthorized);
        }

        Ok(AdminAuth)
    }
}
