//! # Plot Handler
//!
//! `POST /plot` turns the form into a [`ReportRequest`], runs the report
//! pipeline and renders either the report or the "no data" page.

use crate::flash::take_flashes;
use crate::server::AppState;
use crate::session::CurrentUser;
use crate::views::{render, NoDataPage, ResultPage};
use axum::{
    extract::{Extension, State},
    response::Html,
    Form,
};
use lib_core::dto::PlotForm;
use lib_core::{AppError, Result};
use lib_market::{fetch_report, ReportOutcome, ReportRequest};
use lib_utils::parse_iso_date;
use tower_cookies::Cookies;
use tracing::{info, instrument, warn};

#[instrument(skip_all, fields(ticker = %form.ticker, user = %user.username))]
pub async fn plot(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
    Form(form): Form<PlotForm>,
) -> Result<Html<String>> {
    info!("[PLOT] {} {}..{}", form.ticker, form.start_date, form.end_date);

    let errors = form.validate();
    if !errors.is_empty() {
        warn!("[PLOT] Invalid form: {}", errors.summary());
        return Err(AppError::InvalidInput(errors.summary()));
    }

    let start = parse_iso_date(form.start_date.trim())
        .map_err(|e| AppError::InvalidInput(format!("start_date: {}", e)))?;
    let end = parse_iso_date(form.end_date.trim())
        .map_err(|e| AppError::InvalidInput(format!("end_date: {}", e)))?;

    let request = ReportRequest::new(&form.ticker, start, end);
    let outcome = fetch_report(state.provider.as_ref(), &state.report, request).await?;

    let flashes = take_flashes(&cookies);
    let current_user = Some(user.username);

    match outcome {
        ReportOutcome::Ready(report) => {
            info!("[PLOT] Rendering report for {}", report.ticker);
            render(&ResultPage::new(flashes, current_user, report))
        }
        ReportOutcome::NoData => {
            info!("[PLOT] No data for {}", form.ticker);
            render(&NoDataPage {
                flashes,
                current_user,
            })
        }
    }
}
