//! # Price Table
//!
//! The most recent bars as display-ready strings, newest first.

use crate::series::{Bar, PriceSeries};
use lib_utils::{format_fixed2, format_iso_date, format_thousands};

/// Maximum number of rows shown on the report page.
pub const TABLE_ROW_LIMIT: usize = 20;

pub const TABLE_HEADERS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl From<&Bar> for TableRow {
    fn from(bar: &Bar) -> Self {
        Self {
            date: format_iso_date(bar.date),
            open: format_fixed2(bar.open),
            high: format_fixed2(bar.high),
            low: format_fixed2(bar.low),
            close: format_fixed2(bar.close),
            volume: format_thousands(bar.volume),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceTable {
    pub rows: Vec<TableRow>,
}

impl PriceTable {
    /// Up to [`TABLE_ROW_LIMIT`] rows, descending by date.
    pub fn from_series(series: &PriceSeries) -> Self {
        let rows = series
            .latest_first(TABLE_ROW_LIMIT)
            .map(TableRow::from)
            .collect();
        Self { rows }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        &TABLE_HEADERS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
