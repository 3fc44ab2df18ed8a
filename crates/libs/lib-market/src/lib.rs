//! # Market Library
//!
//! Report building for the plot endpoint: fetch daily bars for a ticker,
//! normalize them, compute close statistics, render a chart and a table.
//!
//! ```text
//! MarketDataProvider::fetch → RawFrame
//!     → normalize (lower-case labels) → sort ascending → PriceSeries
//!     → PriceStats + ChartImage + PriceTable → Report
//! ```
//!
//! An empty series ends the pipeline with [`ReportOutcome::NoData`].

pub mod chart;
pub mod error;
pub mod frame;
pub mod provider;
pub mod report;
pub mod series;
pub mod stats;
pub mod table;

// Re-export commonly used types from root for convenience
pub use chart::{ChartImage, ChartOptions};
pub use error::MarketError;
pub use frame::{ColumnKey, Frame, RawColumn, RawFrame};
pub use provider::{MarketDataProvider, ProviderConfig, YahooFinanceClient};
pub use report::{fetch_report, Report, ReportBuilder, ReportOutcome, ReportRequest};
pub use series::{Bar, PriceSeries};
pub use stats::PriceStats;
pub use table::{PriceTable, TableRow};
