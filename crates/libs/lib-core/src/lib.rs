//! # Core Library
//!
//! Configuration, error type, user persistence and form DTOs.

pub mod config;
pub mod error;
pub mod model;
pub mod dto;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{create_pool, prepare_sqlite_path, DbPool};
