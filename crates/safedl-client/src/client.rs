//! Safedl HTTP client implementation.

use reqwest::{Client, RequestBuilder, Url};
use std::time::Duration;

use safedl_core::{
    CatalogStats, Category, ColumnConfiguration, ColumnType, RecordId, SoftwareRecord,
};

use crate::error::ClientError;
use crate::types::{
    AddColumnFieldsRequest, AddColumnRequest, ApiErrorResponse, ColumnMutationResponse,
    DeleteColumnFieldsRequest, DeleteRecordResponse, FieldMutationResponse, HealthStatus,
    NewRecord, RecordPatch, RenameColumnRequest, SaveColumnConfigRequest,
};

/// Safedl catalog API client.
///
/// Reads are public. Mutations send the admin token from [`ClientOptions`].
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
    admin_token: Option<String>,
}

impl CatalogClient {
    /// Create a new read-only catalog client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the safedl service (e.g., `"http://localhost:5000"`)
    ///
    /// # Errors
    ///
    /// - `ClientError::Configuration` if `base_url` is not an http(s) base URL.
    /// - `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new catalog client with custom options.
    ///
    /// # Errors
    ///
    /// - `ClientError::Configuration` if `base_url` is not an http(s) base URL.
    /// - `ClientError::Http` if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let raw = base_url.into();
        let base_url = Url::parse(&raw)
            .map_err(|e| ClientError::Configuration(format!("invalid base URL {raw}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "{raw} cannot be used as a base URL"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url,
            admin_token: options.admin_token,
        })
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment.
    ///
    /// Column keys and other caller-supplied values may contain `/`, `#` or
    /// `?`; they must never split into extra segments or a fragment.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::Configuration(format!(
                    "{} cannot be used as a base URL",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn admin(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.admin_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Check service health.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.client.get(self.url(&["health"])?).send().await?;
        self.handle_response(response).await
    }

    /// Get catalog statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn stats(&self) -> Result<CatalogStats, ClientError> {
        let response = self.client.get(self.url(&["api", "stats"])?).send().await?;
        self.handle_response(response).await
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// List the records of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_records(&self, category: Category) -> Result<Vec<SoftwareRecord>, ClientError> {
        let response = self
            .client
            .get(self.url(&["api", "records", category.as_str()])?)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Create a record.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` if the name is blank or a field is unknown.
    pub async fn create_record(
        &self,
        category: Category,
        record: &NewRecord,
    ) -> Result<SoftwareRecord, ClientError> {
        let response = self
            .admin(self.client.post(self.url(&["api", "records", category.as_str()])?))
            .json(record)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Apply an inline edit to a record.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotFound` if the record doesn't exist.
    /// - `ClientError::Validation` if a field does not fit the configuration.
    pub async fn update_record(
        &self,
        category: Category,
        id: &RecordId,
        patch: &RecordPatch,
    ) -> Result<SoftwareRecord, ClientError> {
        let response = self
            .admin(
                self.client
                    .patch(self.url(&["api", "records", category.as_str(), &id.to_string()])?),
            )
            .json(patch)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the record doesn't exist.
    pub async fn delete_record(
        &self,
        category: Category,
        id: &RecordId,
    ) -> Result<DeleteRecordResponse, ClientError> {
        let response = self
            .admin(
                self.client
                    .delete(self.url(&["api", "records", category.as_str(), &id.to_string()])?),
            )
            .send()
            .await?;
        self.handle_response(response).await
    }

    // =========================================================================
    // Column configuration
    // =========================================================================

    /// Get the column configuration of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn column_config(&self, category: Category) -> Result<ColumnConfiguration, ClientError> {
        let response = self
            .client
            .get(self.url(&["api", "column-config", category.as_str()])?)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Replace the column configuration of a category. Records are not touched.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` on empty, reserved or duplicate keys.
    pub async fn save_column_config(
        &self,
        config: &ColumnConfiguration,
    ) -> Result<ColumnConfiguration, ClientError> {
        let request = SaveColumnConfigRequest {
            category: config.category.as_str(),
            columns: &config.columns,
        };
        let response = self
            .admin(self.client.post(self.url(&["api", "column-config"])?))
            .json(&request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    // =========================================================================
    // Column migrations
    // =========================================================================

    /// Add a column to every record of a category and to its configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` if the label is blank.
    pub async fn add_column(
        &self,
        category: Category,
        label: &str,
        column_type: ColumnType,
    ) -> Result<ColumnMutationResponse, ClientError> {
        let request = AddColumnRequest { label, column_type };
        let response = self
            .admin(self.client.post(self.url(&["api", "columns", category.as_str()])?))
            .json(&request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Change a column label.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the column doesn't exist.
    pub async fn rename_column(
        &self,
        category: Category,
        key: &str,
        label: &str,
    ) -> Result<ColumnMutationResponse, ClientError> {
        let response = self
            .admin(
                self.client
                    .patch(self.url(&["api", "columns", category.as_str(), key])?),
            )
            .json(&RenameColumnRequest { label })
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Remove a column from every record of a category and from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the column doesn't exist.
    pub async fn delete_column(
        &self,
        category: Category,
        key: &str,
    ) -> Result<ColumnMutationResponse, ClientError> {
        let response = self
            .admin(
                self.client
                    .delete(self.url(&["api", "columns", category.as_str(), key])?),
            )
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Write a column's default fields into every record without touching the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` if the key is empty or reserved.
    pub async fn add_record_fields(
        &self,
        category: Category,
        column_key: &str,
        column_type: ColumnType,
    ) -> Result<FieldMutationResponse, ClientError> {
        let request = AddColumnFieldsRequest {
            category: category.as_str(),
            column_key,
            column_type,
        };
        let response = self
            .admin(self.client.post(self.url(&["api", "admin", "columns", "add"])?))
            .json(&request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Strip a column's fields from every record without touching the configuration.
    ///
    /// For url columns the four expanded fields are derived from the key unless
    /// `url_fields` names them.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` if the key is empty or reserved.
    pub async fn delete_record_fields(
        &self,
        category: Category,
        column_key: &str,
        is_url_column: bool,
        url_fields: Option<&[String]>,
    ) -> Result<FieldMutationResponse, ClientError> {
        let request = DeleteColumnFieldsRequest {
            category: category.as_str(),
            column_key,
            is_url_column,
            url_fields,
        };
        let response = self
            .admin(self.client.post(self.url(&["api", "admin", "columns", "delete"])?))
            .json(&request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message;

                // Map specific error codes to typed errors
                match code {
                    "bad_request" => Err(ClientError::Validation(message)),
                    "not_found" => Err(ClientError::NotFound(message)),
                    "internal_error" => Err(ClientError::Storage(message)),
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// Admin bearer token sent on mutations.
    pub admin_token: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            admin_token: None,
        }
    }
}

impl ClientOptions {
    /// Create options carrying an admin token.
    #[must_use]
    pub fn with_admin_token(token: impl Into<String>) -> Self {
        Self {
            admin_token: Some(token.into()),
            ..Self::default()
        }
    }
}
