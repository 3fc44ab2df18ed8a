//! # Authentication Middleware
//!
//! Guards pages that need a logged-in user. The session cookie is validated
//! and the user re-loaded from the database; the result is injected into the
//! request extensions as [`CurrentUser`].
//!
//! Anonymous visitors are redirected to `/login` with an `info` flash.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/", get(pages::index))
//!     .route_layer(from_fn_with_state(state.clone(), require_auth));
//! ```
//!
//! Handlers then extract the user with `Extension<CurrentUser>`.

use crate::flash::{push_flash, FlashCategory};
use crate::server::AppState;
use crate::session::{current_user, end_session, CurrentUser};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;
use tracing::{debug, warn};

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

/// Session guard.
///
/// # Behavior
///
/// - **Valid session**: continues with `CurrentUser` in extensions
/// - **Missing/invalid session or deleted user**: `303 See Other` to `/login`
/// - **Database failure**: the `AppError` response
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Response {
    let user = match current_user(&cookies, &state.db, &state.config).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    let Some(user) = user else {
        warn!("[AUTH] Anonymous request to {}", req.uri().path());
        if cookies.get(crate::session::AUTH_TOKEN).is_some() {
            end_session(&cookies);
        }
        push_flash(&cookies, FlashCategory::Info, LOGIN_REQUIRED_MESSAGE);
        return Redirect::to("/login").into_response();
    };

    debug!("[AUTH] Authenticated user: {} (id: {})", user.username, user.id);

    req.extensions_mut().insert::<CurrentUser>(user);

    next.run(req).await
}
