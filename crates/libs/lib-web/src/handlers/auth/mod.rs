//! # Authentication Handlers
//!
//! Registration, login and logout for the browser forms.
//!
//! ## Flow
//!
//! - `GET /register`, `GET /login` render the empty forms
//! - `POST /register` validates, checks the username is free, hashes the
//!   password with Argon2, stores the user and redirects to `/login`
//! - `POST /login` checks the credentials, sets the session cookie and
//!   redirects to `/`
//! - `GET /logout` clears the session cookie and redirects to `/login`
//!
//! A visitor who already has a valid session is sent to `/` from the login
//! and registration pages.

use crate::flash::{push_flash, take_flashes, FlashCategory};
use crate::server::AppState;
use crate::session::{current_user, end_session, start_session};
use crate::views::{render, LoginPage, RegisterPage};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use lib_auth::{hash_password, verify_password};
use lib_core::dto::{FormErrors, LoginForm, RegisterForm};
use lib_core::model::store::user_repository::is_unique_violation;
use lib_core::model::store::UserRepository;
use lib_core::{AppError, Result};
use tower_cookies::Cookies;
use tracing::{debug, info, instrument, warn};

pub const USERNAME_TAKEN: &str = "That username is taken. Please choose a different one.";
pub const ACCOUNT_CREATED: &str = "Your account has been created! You are now able to log in";
pub const NOT_REGISTERED: &str = "You are not registered yet. Please sign up.";
pub const LOGIN_FAILED: &str = "Login Unsuccessful. Please check username and password";

// region: --- Register

pub async fn register_page(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    if current_user(&cookies, &state.db, &state.config).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    register_form(&cookies, String::new(), FormErrors::new())
}

#[instrument(skip_all, fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    if current_user(&cookies, &state.db, &state.config).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    info!("[REGISTER] New registration request");

    let errors = form.validate();
    if !errors.is_empty() {
        debug!("[REGISTER] Invalid form: {}", errors.summary());
        return register_form(&cookies, form.username, errors);
    }

    if UserRepository::find_by_username(&state.db, &form.username)
        .await?
        .is_some()
    {
        warn!("[REGISTER] Username already taken: {}", form.username);
        return username_taken(&cookies, form.username, errors);
    }

    let password_hash = hash_password(&form.password).map_err(AppError::Internal)?;

    let user = match UserRepository::create(&state.db, &form.username, &password_hash).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            warn!("[REGISTER] Username claimed concurrently: {}", form.username);
            return username_taken(&cookies, form.username, errors);
        }
        Err(e) => return Err(e.into()),
    };

    info!("[REGISTER] User created: {} (id: {})", user.username, user.id);
    push_flash(&cookies, FlashCategory::Success, ACCOUNT_CREATED);

    Ok(Redirect::to("/login").into_response())
}

fn username_taken(cookies: &Cookies, username: String, mut errors: FormErrors) -> Result<Response> {
    errors.add("username", USERNAME_TAKEN);
    push_flash(cookies, FlashCategory::Danger, USERNAME_TAKEN);
    register_form(cookies, username, errors)
}

fn register_form(cookies: &Cookies, username: String, errors: FormErrors) -> Result<Response> {
    let page = RegisterPage {
        flashes: take_flashes(cookies),
        current_user: None,
        username,
        errors,
    };
    Ok(render(&page)?.into_response())
}

// endregion: --- Register

// region: --- Login

pub async fn login_page(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    if current_user(&cookies, &state.db, &state.config).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    login_form(&cookies, String::new(), FormErrors::new())
}

#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if current_user(&cookies, &state.db, &state.config).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    info!("[LOGIN] Login attempt");

    let errors = form.validate();
    if !errors.is_empty() {
        debug!("[LOGIN] Invalid form: {}", errors.summary());
        return login_form(&cookies, form.username, errors);
    }

    let Some(user) = UserRepository::find_by_username(&state.db, &form.username).await? else {
        warn!("[LOGIN] Unknown username: {}", form.username);
        push_flash(&cookies, FlashCategory::Info, NOT_REGISTERED);
        return login_form(&cookies, form.username, errors);
    };

    let is_valid = verify_password(&form.password, &user.password_hash).map_err(AppError::Internal)?;
    if !is_valid {
        warn!("[LOGIN] Invalid password for user: {}", user.username);
        push_flash(&cookies, FlashCategory::Danger, LOGIN_FAILED);
        return login_form(&cookies, form.username, errors);
    }

    start_session(&cookies, &state.config, &user)?;
    info!("[LOGIN] User logged in: {} (id: {})", user.username, user.id);

    Ok(Redirect::to("/").into_response())
}

fn login_form(cookies: &Cookies, username: String, errors: FormErrors) -> Result<Response> {
    let page = LoginPage {
        flashes: take_flashes(cookies),
        current_user: None,
        username,
        errors,
    };
    Ok(render(&page)?.into_response())
}

// endregion: --- Login

/// `GET /logout`
pub async fn logout(cookies: Cookies) -> Redirect {
    end_session(&cookies);
    info!("[LOGOUT] Session cleared");
    Redirect::to("/login")
}

#[cfg(test)]
mod tests;
