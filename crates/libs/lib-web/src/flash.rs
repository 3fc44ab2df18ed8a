//! # Flash Messages
//!
//! One-shot messages carried to the next rendered page in a `flash` cookie
//! (base64url-encoded JSON list). Rendering a page takes them out of the
//! cookie, so each message shows once.

use lib_utils::{b64u_decode_to_string, b64u_encode};
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::debug;

pub const FLASH_COOKIE: &str = "flash";

/// Bootstrap alert category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Info,
    Danger,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Info => "info",
            FlashCategory::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Queue a message for the next rendered page.
pub fn push_flash(cookies: &Cookies, category: FlashCategory, message: impl Into<String>) {
    let mut flashes = read_flashes(cookies);
    flashes.push(Flash::new(category, message));

    let Ok(json) = serde_json::to_string(&flashes) else {
        return;
    };

    let cookie = Cookie::build((FLASH_COOKIE, b64u_encode(json)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookies.add(cookie);
}

/// Drain every queued message.
pub fn take_flashes(cookies: &Cookies) -> Vec<Flash> {
    let flashes = read_flashes(cookies);
    if cookies.get(FLASH_COOKIE).is_some() {
        let mut cookie = Cookie::from(FLASH_COOKIE);
        cookie.set_path("/");
        cookies.remove(cookie);
    }
    flashes
}

fn read_flashes(cookies: &Cookies) -> Vec<Flash> {
    let Some(cookie) = cookies.get(FLASH_COOKIE) else {
        return Vec::new();
    };

    b64u_decode_to_string(cookie.value())
        .ok()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_else(|| {
            debug!("[FLASH] Ignoring malformed flash cookie");
            Vec::new()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names() {
        assert_eq!(FlashCategory::Success.as_str(), "success");
        assert_eq!(FlashCategory::Info.as_str(), "info");
        assert_eq!(FlashCategory::Danger.as_str(), "danger");
    }

    #[test]
    fn test_push_then_take() {
        let cookies = Cookies::default();
        push_flash(&cookies, FlashCategory::Info, "first");
        push_flash(&cookies, FlashCategory::Danger, "second");

        let flashes = take_flashes(&cookies);
        assert_eq!(
            flashes,
            vec![
                Flash::new(FlashCategory::Info, "first"),
                Flash::new(FlashCategory::Danger, "second"),
            ]
        );
        assert!(take_flashes(&cookies).is_empty());
    }

    #[test]
    fn test_malformed_cookie_is_ignored() {
        let cookies = Cookies::default();
        cookies.add(Cookie::new(FLASH_COOKIE, "%%%not-base64"));
        assert!(take_flashes(&cookies).is_empty());
    }
}
