//! # Middleware
//!
//! Axum middleware for the session guard, request stamping and request logging.
//!
//! ## Modules
//!
//! - **[`mw_auth`]**: Session cookie guard for pages that need a logged-in user
//! - **[`mw_req_stamp`]**: Request ID and timestamp stamping
//! - **[`mw_logging`]**: Request/response logging

// region: --- Modules
pub mod mw_auth;
pub mod mw_logging;
pub mod mw_req_stamp;
// endregion: --- Modules

// region: --- Re-exports
pub use mw_auth::require_auth;
pub use mw_logging::log_requests;
pub use mw_req_stamp::{stamp_req, RequestStamp};
// endregion: --- Re-exports
