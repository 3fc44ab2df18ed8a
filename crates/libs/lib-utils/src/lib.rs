//! # Utilities Library
//!
//! Shared helpers for base64, environment variables, ISO dates, form validation
//! and number formatting.

pub mod b64;
pub mod envs;
pub mod fmt;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use b64::{b64_encode, b64u_decode, b64u_decode_to_string, b64u_encode, data_uri};
pub use envs::{get_env, get_env_or, get_env_parse, get_env_parse_or};
pub use fmt::{format_fixed2, format_thousands};
pub use time::{format_iso_date, parse_iso_date};
pub use validation::{validate_equal, validate_length_range, validate_required};
