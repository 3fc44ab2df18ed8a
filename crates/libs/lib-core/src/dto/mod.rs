//! # Data Transfer Objects (DTOs)
//!
//! Form payloads posted by the browser, with their validation rules.

pub mod forms;

pub use forms::*;
