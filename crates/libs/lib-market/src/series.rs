//! # Price Series
//!
//! Daily bars for one ticker, kept in ascending date order with no duplicate
//! dates. A series is built fresh for each request and dropped with the
//! response.

use chrono::NaiveDate;

/// One day's OHLCV record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Ordered daily bars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series from bars in any order.
    ///
    /// Bars are sorted ascending; when a date repeats, the bar seen last wins.
    pub fn from_bars(bars: Vec<Bar>) -> Self {
        let mut series = Self { bars };
        series.sort_ascending();
        series
    }

    /// Sort ascending by date and drop duplicate dates. Idempotent.
    pub fn sort_ascending(&mut self) {
        // Stable sort keeps later duplicates after earlier ones
        self.bars.sort_by_key(|bar| bar.date);

        let mut deduped: Vec<Bar> = Vec::with_capacity(self.bars.len());
        for bar in self.bars.drain(..) {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        self.bars = deduped;
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices in chronological order.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|bar| bar.close)
    }

    /// Bars from most recent to oldest, at most `limit` of them.
    pub fn latest_first(&self, limit: usize) -> impl Iterator<Item = &Bar> + '_ {
        self.bars.iter().rev().take(limit)
    }
}
