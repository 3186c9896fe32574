//! Local column configuration cache.
//!
//! One JSON file per category, `column_config_{category}.json`, holding the
//! last configuration the client saw together with its `updatedAt` stamp.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use safedl_core::{Category, ColumnConfiguration};

use crate::error::ClientError;

/// Directory-backed cache of column configurations.
#[derive(Debug, Clone)]
pub struct ConfigCache {
    dir: PathBuf,
}

impl ConfigCache {
    /// Cache rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the configuration of `category`.
    #[must_use]
    pub fn path(&self, category: Category) -> PathBuf {
        self.dir.join(format!("column_config_{category}.json"))
    }

    /// Load the cached configuration of `category`, if any.
    ///
    /// # Errors
    ///
    /// - `ClientError::Cache` if the file exists but cannot be read.
    /// - `ClientError::Serialization` if the file is not a configuration.
    pub async fn load(&self, category: Category) -> Result<Option<ColumnConfiguration>, ClientError> {
        let path = self.path(category);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(cache_error(&path, &e)),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Persist `config`, replacing any previous entry for its category.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Cache` if the directory or file cannot be written.
    pub async fn store(&self, config: &ColumnConfiguration) -> Result<(), ClientError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| cache_error(&self.dir, &e))?;

        let path = self.path(config.category);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(config)?;

        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| cache_error(&tmp, &e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| cache_error(&path, &e))?;

        tracing::debug!(
            category = %config.category,
            columns = config.columns.len(),
            path = %path.display(),
            "Column configuration cached"
        );
        Ok(())
    }
}

fn cache_error(path: &Path, err: &std::io::Error) -> ClientError {
    ClientError::Cache(format!("{}: {err}", path.display()))
}
