//! Safedl HTTP API Service.
//!
//! This crate serves the software download catalog:
//!
//! - Per-category software records with inline editing
//! - Column configuration per category
//! - Column add, rename and delete as single migrations over records and configuration
//! - Catalog statistics
//!
//! # Authentication
//!
//! Reads are public. Every mutating route requires the admin bearer token
//! configured through `ADMIN_API_KEY`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Store calls are synchronous; handlers stay async for axum

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
