//! API handlers.

pub mod column_config;
pub mod columns;
pub mod health;
pub mod records;
pub mod stats;
