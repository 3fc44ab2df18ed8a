//! # Report Builder
//!
//! Ties the pipeline together: provider frame → series → statistics, chart
//! and table. Building is CPU-bound (chart rasterization and PNG encoding), so
//! [`fetch_report`] moves it off the async runtime.

use crate::chart::{render_chart, ChartImage, ChartOptions};
use crate::error::MarketError;
use crate::frame::RawFrame;
use crate::provider::MarketDataProvider;
use crate::stats::PriceStats;
use crate::table::PriceTable;
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

/// One plot request from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportRequest {
    /// Ticker is trimmed and upper-cased.
    pub fn new(ticker: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            start,
            end,
        }
    }
}

/// Everything the report page shows.
#[derive(Debug, Clone)]
pub struct Report {
    pub ticker: String,
    pub stats: PriceStats,
    pub min_price: String,
    pub max_price: String,
    pub mean_price: String,
    pub chart: ChartImage,
    pub table: PriceTable,
}

#[derive(Debug, Clone)]
pub enum ReportOutcome {
    Ready(Report),
    /// The provider returned no usable bars.
    NoData,
}

#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    pub chart: ChartOptions,
}

impl ReportBuilder {
    pub fn new(chart: ChartOptions) -> Self {
        Self { chart }
    }

    /// Build the report for `ticker` from a provider frame.
    pub fn build(&self, ticker: &str, raw: RawFrame) -> Result<ReportOutcome, MarketError> {
        let series = raw.normalize().sort_ascending().into_series()?;

        let Some(stats) = PriceStats::from_series(&series) else {
            return Ok(ReportOutcome::NoData);
        };

        let chart = render_chart(ticker, &series, self.chart)?;
        let table = PriceTable::from_series(&series);

        Ok(ReportOutcome::Ready(Report {
            ticker: ticker.to_uppercase(),
            min_price: stats.min_display(),
            max_price: stats.max_display(),
            mean_price: stats.mean_display(),
            stats,
            chart,
            table,
        }))
    }
}

/// Fetch bars for `request` and build the report.
#[instrument(skip(provider, builder), fields(ticker = %request.ticker))]
pub async fn fetch_report(
    provider: &dyn MarketDataProvider,
    builder: &ReportBuilder,
    request: ReportRequest,
) -> Result<ReportOutcome, MarketError> {
    let raw = provider
        .fetch(&request.ticker, request.start, request.end)
        .await?;
    debug!("Provider returned {} rows", raw.index.len());

    let builder = builder.clone();
    let ticker = request.ticker;
    let outcome = tokio::task::spawn_blocking(move || builder.build(&ticker, raw))
        .await
        .map_err(|e| MarketError::Task(e.to_string()))??;

    match &outcome {
        ReportOutcome::Ready(report) => info!(
            "Report ready: {} bars, close {}..{}",
            report.table.len(),
            report.min_price,
            report.max_price
        ),
        ReportOutcome::NoData => info!("No data for requested range"),
    }

    Ok(outcome)
}
