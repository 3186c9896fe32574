//! Safedl Client SDK.
//!
//! This crate provides a client library for the safedl catalog API and a
//! [`TableView`] that keeps one category's columns and records in sync with
//! the server, with a local configuration cache for when it is unreachable.
//!
//! # Example
//!
//! ```no_run
//! use safedl_client::{CatalogClient, ClientOptions, ConfigCache, DeleteOutcome, TableView};
//! use safedl_core::{Category, ColumnType};
//!
//! # async fn example() -> Result<(), safedl_client::ClientError> {
//! let client = CatalogClient::with_options(
//!     "http://localhost:5000",
//!     ClientOptions::with_admin_token("your-admin-key"),
//! )?;
//! let cache = ConfigCache::new("/var/cache/safedl");
//!
//! let mut table = TableView::load(client, cache, Category::Tools).await?;
//! let column = table.add_column("License Key", ColumnType::Text).await?;
//!
//! let outcome = table.delete_column(&column.key, |c| c.label == "License Key").await?;
//! assert!(matches!(outcome, DeleteOutcome::Deleted(_)));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cache;
mod client;
mod error;
pub mod render;
mod table;
mod types;

pub use cache::ConfigCache;
pub use client::{CatalogClient, ClientOptions};
pub use error::ClientError;
pub use render::{render_cell, CellView, RenderMode};
pub use table::{DeleteOutcome, TableView};
pub use types::*;
