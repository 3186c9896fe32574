//! Table view of one category: configuration, records and reconciliation.
//!
//! Column mutations go to the server first. The view then reloads the
//! category's records; when the reload fails it patches its local copy to
//! match the mutation instead. Every configuration the view adopts is written
//! to the [`ConfigCache`], which `load` falls back to when the server cannot
//! answer.

use safedl_core::{
    Category, ColumnConfiguration, ColumnDescriptor, ColumnType, FieldValue, RecordId,
    SoftwareRecord,
};

use crate::cache::ConfigCache;
use crate::client::CatalogClient;
use crate::error::ClientError;
use crate::render::{render_cell, CellView, RenderMode};
use crate::types::{ColumnMutationResponse, RecordPatch};

/// Outcome of [`TableView::delete_column`].
#[derive(Debug, Clone)]
pub enum DeleteOutcome {
    /// The caller declined; nothing was sent.
    Cancelled,
    /// The column is gone from the server.
    Deleted(ColumnMutationResponse),
}

/// Client-side table of one category.
#[derive(Debug)]
pub struct TableView {
    client: CatalogClient,
    cache: ConfigCache,
    category: Category,
    config: ColumnConfiguration,
    records: Vec<SoftwareRecord>,
}

impl TableView {
    /// Load the configuration and records of `category`.
    ///
    /// When the configuration cannot be fetched because the server is
    /// unreachable or failing, the cached configuration is used instead.
    ///
    /// # Errors
    ///
    /// Returns an error if records cannot be fetched, or if the configuration
    /// cannot be fetched and nothing is cached.
    pub async fn load(
        client: CatalogClient,
        cache: ConfigCache,
        category: Category,
    ) -> Result<Self, ClientError> {
        let config = match client.column_config(category).await {
            Ok(config) => {
                if let Err(e) = cache.store(&config).await {
                    tracing::warn!(%category, error = %e, "Failed to cache column configuration");
                }
                config
            }
            Err(e) if e.is_unavailable() => cached_config(&cache, category, e).await?,
            Err(e) => return Err(e),
        };

        let records = client.list_records(category).await?;

        tracing::debug!(
            %category,
            columns = config.columns.len(),
            records = records.len(),
            "Table loaded"
        );

        Ok(Self {
            client,
            cache,
            category,
            config,
            records,
        })
    }

    /// Category shown by this view.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Current column configuration.
    #[must_use]
    pub fn configuration(&self) -> &ColumnConfiguration {
        &self.config
    }

    /// Ordered columns.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.config.columns
    }

    /// Records as last seen.
    #[must_use]
    pub fn records(&self) -> &[SoftwareRecord] {
        &self.records
    }

    /// Find a record by ID.
    #[must_use]
    pub fn record(&self, id: &RecordId) -> Option<&SoftwareRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Render every configured column of `record`, in column order.
    #[must_use]
    pub fn render_row(&self, record: &SoftwareRecord, mode: RenderMode) -> Vec<CellView> {
        self.config
            .columns
            .iter()
            .map(|column| render_cell(column, record, mode))
            .collect()
    }

    /// Fetch the records again.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; local records are left as they were.
    pub async fn reload(&mut self) -> Result<(), ClientError> {
        self.records = self.client.list_records(self.category).await?;
        Ok(())
    }

    /// Add a column and give every record its defaults.
    ///
    /// # Errors
    ///
    /// Returns the server's error; local state is unchanged in that case.
    pub async fn add_column(
        &mut self,
        label: &str,
        column_type: ColumnType,
    ) -> Result<ColumnDescriptor, ClientError> {
        let mutation = self
            .client
            .add_column(self.category, label, column_type)
            .await?;

        let defaults = mutation.column.default_fields();
        self.refresh_records(|records| {
            for record in records {
                record.fill_fields(&defaults);
            }
        })
        .await;
        self.adopt(mutation.configuration).await;

        tracing::info!(
            category = %self.category,
            key = %mutation.column.key,
            "Column added"
        );
        Ok(mutation.column)
    }

    /// Change a column label. Records are not reloaded.
    ///
    /// # Errors
    ///
    /// Returns the server's error; local state is unchanged in that case.
    pub async fn rename_column(
        &mut self,
        key: &str,
        label: &str,
    ) -> Result<ColumnDescriptor, ClientError> {
        let mutation = self.client.rename_column(self.category, key, label).await?;
        self.adopt(mutation.configuration).await;
        Ok(mutation.column)
    }

    /// Delete a column after `confirm` approves it.
    ///
    /// `confirm` receives the column about to be deleted. Returning `false`
    /// cancels without contacting the server.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotFound` if the view has no such column.
    /// - The server's error; local state is unchanged in that case.
    pub async fn delete_column<F>(&mut self, key: &str, confirm: F) -> Result<DeleteOutcome, ClientError>
    where
        F: FnOnce(&ColumnDescriptor) -> bool,
    {
        let column = self
            .config
            .find(key)
            .ok_or_else(|| ClientError::NotFound(format!("column not found: {key}")))?;

        if !confirm(column) {
            tracing::debug!(category = %self.category, %key, "Column deletion cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let mutation = self.client.delete_column(self.category, key).await?;

        let fields = mutation.column.physical_fields();
        self.refresh_records(|records| {
            for record in records {
                record.strip_fields(&fields);
            }
        })
        .await;
        self.adopt(mutation.configuration.clone()).await;

        tracing::info!(category = %self.category, %key, "Column deleted");
        Ok(DeleteOutcome::Deleted(mutation))
    }

    /// Write one cell and replace the local record with the server's copy.
    ///
    /// # Errors
    ///
    /// Returns the server's error; the local record is unchanged in that case.
    pub async fn update_cell(
        &mut self,
        id: &RecordId,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<&SoftwareRecord, ClientError> {
        let patch = RecordPatch::field(field, value);
        let updated = self
            .client
            .update_record(self.category, id, &patch)
            .await?;

        let index = match self.records.iter().position(|r| r.id == updated.id) {
            Some(index) => {
                self.records[index] = updated;
                index
            }
            None => {
                self.records.push(updated);
                self.records.len() - 1
            }
        };
        Ok(&self.records[index])
    }

    /// Reload records, or apply `patch` locally when the reload fails.
    async fn refresh_records(&mut self, patch: impl FnOnce(&mut [SoftwareRecord])) {
        if let Err(e) = self.reload().await {
            tracing::warn!(
                category = %self.category,
                error = %e,
                "Reload failed - patching local records"
            );
            patch(&mut self.records);
        }
    }

    /// Take `config` as current and cache it.
    async fn adopt(&mut self, config: ColumnConfiguration) {
        self.config = config;
        if let Err(e) = self.cache.store(&self.config).await {
            tracing::warn!(category = %self.category, error = %e, "Failed to cache column configuration");
        }
    }
}

async fn cached_config(
    cache: &ConfigCache,
    category: Category,
    fetch_error: ClientError,
) -> Result<ColumnConfiguration, ClientError> {
    match cache.load(category).await {
        Ok(Some(config)) => {
            tracing::warn!(
                %category,
                error = %fetch_error,
                updated_at = %config.updated_at,
                "Column configuration unavailable - using cached copy"
            );
            Ok(config)
        }
        Ok(None) => Err(fetch_error),
        Err(e) => {
            tracing::warn!(%category, error = %e, "Column configuration cache unreadable");
            Err(fetch_error)
        }
    }
}
