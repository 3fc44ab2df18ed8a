//! # Market Data Providers
//!
//! Daily bar sources. The web layer holds a provider as
//! `Arc<dyn MarketDataProvider>` so tests can swap in a fixture.

mod yahoo;

pub use yahoo::{ProviderConfig, YahooFinanceClient};

use crate::error::MarketError;
use crate::frame::RawFrame;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of daily OHLCV bars.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch daily bars for `ticker` from `start` (inclusive) to `end`
    /// (exclusive).
    ///
    /// An unknown ticker or an empty range is not an error: it yields an empty
    /// frame.
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawFrame, MarketError>;
}
