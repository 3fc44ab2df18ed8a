//! # Authentication Library
//!
//! Password hashing and signed session tokens.

pub mod pwd;
pub mod token;

// Re-export commonly used types
pub use pwd::{hash_password, verify_password};
pub use token::{decode_session_token, encode_session_token, SessionClaims};
