//! Core types and utilities for safedl.
//!
//! This crate provides the foundational types of the download catalog:
//!
//! - **Categories**: `Category`
//! - **Columns**: `ColumnType`, `ColumnDescriptor`, `ColumnConfiguration`
//! - **Records**: `SoftwareRecord`, `FieldValue`, `RecordId`
//! - **Statistics**: `CatalogStats`, `CategoryBreakdown`
//!
//! # Columns and physical fields
//!
//! A logical column is described once per category in its
//! `ColumnConfiguration`, but stored on every record of that category.
//! Most column types map to a single record field named after the column
//! key; `url` columns expand into four fields (`{key}32`, `{key}64`,
//! `{key}Common`, `{key}Show`).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod category;
pub mod column;
pub mod error;
pub mod ids;
pub mod record;
pub mod stats;

pub use category::Category;
pub use column::{
    default_fields, generate_key, physical_fields, url_fields, ColumnConfiguration,
    ColumnDescriptor, ColumnType, ShowMode, DEFAULT_SHOW_TAG,
};
pub use error::{CatalogError, Result};
pub use ids::{IdError, RecordId};
pub use record::{is_reserved_field, FieldValue, SoftwareRecord, RESERVED_FIELDS};
pub use stats::{CatalogStats, CategoryBreakdown};
