//! # HTTP Request Handlers
//!
//! Page handlers grouped by feature.
//!
//! - **[`auth`]**: registration, login and logout
//!   - `GET/POST /register`
//!   - `GET/POST /login`
//!   - `GET /logout`
//! - **[`pages`]**: entry page and health check
//!   - `GET /` (session required)
//!   - `GET /health`
//! - **[`plot`]**: price report
//!   - `POST /plot` (session required)
//!
//! Handlers return `lib_core::Result`, so any `AppError` becomes an HTML
//! error page. Validation problems are not errors: they re-render the form
//! with field messages and flashes.
//!
//! ```text
//! Request
//!     ↓
//! CookieManagerLayer → stamp_req → log_requests
//!     ↓
//! require_auth (/, /plot)
//!     ↓
//! Handler → askama view
//! ```

pub mod auth;
pub mod pages;
pub mod plot;
