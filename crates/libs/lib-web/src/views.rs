//! # Views
//!
//! askama page templates (`crates/libs/lib-web/templates`). Every page
//! extends `base.html`, which renders the navigation and the flash messages.

use crate::flash::Flash;
use askama::Template;
use axum::response::Html;
use lib_core::dto::FormErrors;
use lib_core::{AppError, Result};
use lib_market::Report;

/// Render a template into an HTML response.
pub fn render<T: Template>(template: &T) -> Result<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Render(format!("template: {}", e)))
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub flashes: Vec<Flash>,
    pub current_user: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub flashes: Vec<Flash>,
    pub current_user: Option<String>,
    pub username: String,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub flashes: Vec<Flash>,
    pub current_user: Option<String>,
    pub username: String,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultPage {
    pub flashes: Vec<Flash>,
    pub current_user: Option<String>,
    pub report: Report,
    pub chart_uri: String,
}

impl ResultPage {
    pub fn new(flashes: Vec<Flash>, current_user: Option<String>, report: Report) -> Self {
        let chart_uri = report.chart.data_uri();
        Self {
            flashes,
            current_user,
            report,
            chart_uri,
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct NoDataPage {
    pub flashes: Vec<Flash>,
    pub current_user: Option<String>,
}
