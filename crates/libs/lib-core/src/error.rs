//! # Centralized Error Handling
//!
//! [`AppError`] is the error type handlers return. It maps onto an HTTP status
//! and renders a small generic failure page; the detailed message only goes
//! to the server log.
//!
//! ## Error Categories
//!
//! 1. **Client Errors** (4xx)
//!    - [`InvalidInput`](AppError::InvalidInput) → 400 Bad Request
//!    - [`NotFound`](AppError::NotFound) → 404 Not Found
//!
//! 2. **Server Errors** (5xx)
//!    - [`Provider`](AppError::Provider) → 502 Bad Gateway (market data source)
//!    - [`Config`](AppError::Config), [`Render`](AppError::Render),
//!      [`Internal`](AppError::Internal) → 500 Internal Server Error
//!
//! Form validation problems (bad credentials, duplicate username) are not
//! errors at this level: handlers recover them into flash messages.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Market data provider failure (transport, HTTP status, lookup, bad payload).
    ///
    /// **HTTP Status**: 502 Bad Gateway
    #[error("Market data provider error: {0}")]
    Provider(String),

    /// Chart, image or template rendering failed.
    #[error("Render error: {0}")]
    Render(String),

    /// Invalid user input.
    ///
    /// **HTTP Status**: 400 Bad Request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error (unexpected failures).
    #[error("Internal error: {0}")]
    Internal(String),

    /// Requested resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Render(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a user-facing message.
    ///
    /// Server-side failures get a generic message so internals are not exposed.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Provider(_) => "Market data provider unavailable".to_string(),
            AppError::Config(_) | AppError::Render(_) | AppError::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        match status {
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                tracing::debug!("Client error: {}", self);
            }
            _ => {
                tracing::error!("Server error: {}", self);
            }
        }

        let body = format!(
            "<!DOCTYPE html>\n<html>\n<head><title>{code}</title></head>\n<body>\n<h1>{code}</h1>\n<p>{message}</p>\n<a href=\"/\">Go Back</a>\n</body>\n</html>\n",
            code = status,
            message = escape_html(&message),
        );

        (status, Html(body)).into_response()
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Convert `sqlx::Error` to `AppError`.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Database record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                AppError::Internal(format!("Database error: {}", db_err.message()))
            }
            _ => AppError::Internal(format!("Database error: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Provider("timeout".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::InvalidInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Render("png".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::Provider("dns error: query1.finance.yahoo.com".into());
        assert_eq!(err.user_message(), "Market data provider unavailable");
    }

    #[test]
    fn test_user_message_is_escaped() {
        assert_eq!(escape_html("<b>\"x\" & y</b>"), "&lt;b&gt;&quot;x&quot; &amp; y&lt;/b&gt;");
    }
}
