//! # Session Cookie
//!
//! The logged-in user is carried in the `auth-token` cookie as a signed
//! session token. The user row is re-loaded on every guarded request, so a
//! deleted account loses access immediately.

use lib_auth::{decode_session_token, encode_session_token};
use lib_core::model::store::{User, UserRepository};
use lib_core::{AppError, Config, DbPool, Result};
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::debug;

pub const AUTH_TOKEN: &str = "auth-token";

/// Authenticated user, placed in request extensions by the auth guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Issue a token for `user` and store it in the session cookie.
pub fn start_session(cookies: &Cookies, config: &Config, user: &User) -> Result<()> {
    let token = encode_session_token(
        user.id,
        user.username.clone(),
        &config.session_secret,
        config.session_expiration_hours,
    )
    .map_err(AppError::Internal)?;

    let cookie = Cookie::build((AUTH_TOKEN, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookies.add(cookie);

    Ok(())
}

pub fn end_session(cookies: &Cookies) {
    let mut cookie = Cookie::from(AUTH_TOKEN);
    cookie.set_path("/");
    cookies.remove(cookie);
}

/// The user behind the session cookie, if the token is valid and the user
/// still exists.
pub async fn current_user(
    cookies: &Cookies,
    db: &DbPool,
    config: &Config,
) -> Result<Option<CurrentUser>> {
    let Some(token) = cookies.get(AUTH_TOKEN).map(|c| c.value().to_string()) else {
        return Ok(None);
    };

    let claims = match decode_session_token(&token, &config.session_secret) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("[AUTH] Rejected session token: {}", e);
            return Ok(None);
        }
    };

    let Some(user_id) = claims.user_id() else {
        return Ok(None);
    };

    let user = UserRepository::find_by_id(db, user_id).await?;
    Ok(user.map(CurrentUser::from))
}
