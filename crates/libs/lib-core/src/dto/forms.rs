//! # Form DTOs
//!
//! `application/x-www-form-urlencoded` bodies for the registration, login
//! and plot forms. Missing fields deserialize as empty strings so that
//! validation, not the extractor, decides what the user sees.
//!
//! | Form | Fields | Rules |
//! |------|--------|-------|
//! | [`RegisterForm`] | username, password, confirm_password | username 2-20 chars; all required; confirmation equals password |
//! | [`LoginForm`] | username, password | username 2-20 chars; both required |
//! | [`PlotForm`] | ticker, start_date, end_date | all required |

use lib_utils::validation::{validate_equal, validate_length_range, validate_required};
use serde::Deserialize;

pub const USERNAME_MIN_LEN: usize = 2;
pub const USERNAME_MAX_LEN: usize = 20;

/// Field-level validation messages, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    errors: Vec<(&'static str, String)>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    /// Record the error side of a validation result, if any.
    fn check(&mut self, field: &'static str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages for one field, used by the templates.
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
            .collect()
    }

    /// All messages, each prefixed by its field name.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    /// Check the field rules. Username uniqueness needs the database and is
    /// checked by the handler.
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        match validate_required(&self.username) {
            Ok(()) => errors.check(
                "username",
                validate_length_range(&self.username, USERNAME_MIN_LEN, USERNAME_MAX_LEN),
            ),
            Err(message) => errors.add("username", message),
        }

        errors.check("password", validate_required(&self.password));

        match validate_required(&self.confirm_password) {
            Ok(()) => errors.check(
                "confirm_password",
                validate_equal(&self.confirm_password, &self.password, "password"),
            ),
            Err(message) => errors.add("confirm_password", message),
        }

        errors
    }
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        match validate_required(&self.username) {
            Ok(()) => errors.check(
                "username",
                validate_length_range(&self.username, USERNAME_MIN_LEN, USERNAME_MAX_LEN),
            ),
            Err(message) => errors.add("username", message),
        }

        errors.check("password", validate_required(&self.password));

        errors
    }
}

/// Plot request form. Dates are ISO `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlotForm {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

impl PlotForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        errors.check("ticker", validate_required(&self.ticker));
        errors.check("start_date", validate_required(&self.start_date));
        errors.check("end_date", validate_required(&self.end_date));
        errors
    }
}
