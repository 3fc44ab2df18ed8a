//! Entry page and health check.

use crate::flash::take_flashes;
use crate::session::CurrentUser;
use crate::views::{render, IndexPage};
use axum::{extract::Extension, response::Html};
use lib_core::Result;
use tower_cookies::Cookies;

/// `GET /` - the plot form.
pub async fn index(
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
) -> Result<Html<String>> {
    render(&IndexPage {
        flashes: take_flashes(&cookies),
        current_user: Some(user.username),
    })
}

/// `GET /health`
pub async fn health() -> &'static str {
    "OK"
}
