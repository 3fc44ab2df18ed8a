//! # Request/Response Logging Middleware
//!
//! One structured line per request and one per response, tagged with the
//! request id from [`stamp_req`](super::stamp_req). Credentials never reach
//! the log: cookie and authorization headers are redacted, and form posts to
//! the login and registration pages only log their path.

use super::mw_req_stamp::RequestStamp;
use axum::{
    extract::Request,
    http::{Extensions, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Headers whose values are never logged.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "x-api-key"];

/// Paths whose query strings are never logged.
const SENSITIVE_ENDPOINTS: &[&str] = &["/login", "/register"];

pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_sensitive = SENSITIVE_ENDPOINTS.iter().any(|ep| path == *ep);
    let query = if is_sensitive {
        None
    } else {
        req.uri().query().map(str::to_string)
    };

    let (request_id, received_at) = stamp_fields(req.extensions());

    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    info!(
        request_id = %request_id,
        received_at = %received_at,
        method = %method,
        path = %path,
        query = ?query,
        user_agent = ?user_agent,
        "[REQUEST] {} {}",
        method,
        path
    );
    debug!(
        request_id = %request_id,
        headers = ?redact_headers(req.headers()),
        "[REQUEST HEADERS]"
    );

    let response = next.run(req).await;

    let elapsed_ms = start.elapsed().as_millis();
    let status = response.status();

    if status.is_server_error() {
        error!(
            request_id = %request_id,
            status = status.as_u16(),
            duration_ms = elapsed_ms,
            "[RESPONSE] {} {} -> {} ({}ms) [SERVER ERROR]",
            method,
            path,
            status.as_u16(),
            elapsed_ms
        );
    } else if status.is_client_error() {
        warn!(
            request_id = %request_id,
            status = status.as_u16(),
            duration_ms = elapsed_ms,
            "[RESPONSE] {} {} -> {} ({}ms) [CLIENT ERROR]",
            method,
            path,
            status.as_u16(),
            elapsed_ms
        );
    } else {
        info!(
            request_id = %request_id,
            status = status.as_u16(),
            duration_ms = elapsed_ms,
            "[RESPONSE] {} {} -> {} ({}ms)",
            method,
            path,
            status.as_u16(),
            elapsed_ms
        );
    }

    response
}

/// Request id and RFC 3339 receive time, or `unknown` when the request was
/// not stamped.
fn stamp_fields(extensions: &Extensions) -> (String, String) {
    match extensions.get::<RequestStamp>() {
        Some(stamp) => (stamp.id.clone(), stamp.received_at.to_rfc3339()),
        None => ("unknown".to_string(), "unknown".to_string()),
    }
}

/// Header name/value pairs with sensitive values masked.
fn redact_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name = name.as_str().to_string();
            let value = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                "***REDACTED***".to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_stamp_fields() {
        let mut extensions = Extensions::new();
        assert_eq!(
            stamp_fields(&extensions),
            ("unknown".to_string(), "unknown".to_string())
        );

        extensions.insert(RequestStamp {
            id: "67e55044-10b1-426f-9247-bb680e5fe0c8".to_string(),
            received_at: Utc.with_ymd_and_hms(2023, 1, 3, 14, 30, 0).unwrap(),
        });
        let (id, received_at) = stamp_fields(&extensions);
        assert_eq!(id, "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(received_at, "2023-01-03T14:30:00+00:00");
    }

    #[test]
    fn test_cookies_are_redacted() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("auth-token=secret"));
        headers.insert("accept", HeaderValue::from_static("text/html"));

        let redacted = redact_headers(&headers);
        assert!(redacted.contains(&("cookie".to_string(), "***REDACTED***".to_string())));
        assert!(redacted.contains(&("accept".to_string(), "text/html".to_string())));
    }
}
