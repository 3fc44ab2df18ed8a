//! # Provider Frames
//!
//! Providers hand back loosely typed tables. Column identifiers may be a
//! plain label (`"Close"`) or a multi-level one (`("Close", "AAPL")`), and
//! any cell may be missing. [`RawFrame::normalize`] reduces every identifier
//! to one lower-case token, then [`Frame::into_series`] turns the table into
//! typed [`Bar`]s.
//!
//! When several columns normalize to the same label (one per ticker in a
//! multi-level frame), the first one is used.

use crate::error::MarketError;
use crate::series::{Bar, PriceSeries};
use chrono::NaiveDate;
use tracing::trace;

/// Column identifier as returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKey {
    Single(String),
    Composite(Vec<String>),
}

impl ColumnKey {
    /// Lower-case label; the first level of a composite identifier.
    pub fn normalized(&self) -> String {
        match self {
            ColumnKey::Single(label) => label.to_lowercase(),
            ColumnKey::Composite(levels) => levels
                .first()
                .map(|label| label.to_lowercase())
                .unwrap_or_default(),
        }
    }
}

/// One provider column, aligned with the frame index.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub key: ColumnKey,
    pub values: Vec<Option<f64>>,
}

impl RawColumn {
    pub fn new(key: ColumnKey, values: Vec<Option<f64>>) -> Self {
        Self { key, values }
    }
}

/// Un-normalized provider output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    pub index: Vec<NaiveDate>,
    pub columns: Vec<RawColumn>,
}

impl RawFrame {
    /// A frame with no rows: the provider found nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Lower-case every column label.
    pub fn normalize(self) -> Frame {
        let rows = self.index.len();
        let columns = self
            .columns
            .into_iter()
            .map(|column| {
                let mut values = column.values;
                // Short columns are padded with missing cells
                values.resize(rows, None);
                (column.key.normalized(), values)
            })
            .collect();

        Frame {
            index: self.index,
            columns,
        }
    }
}

/// Frame with single-token lower-case labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    index: Vec<NaiveDate>,
    columns: Vec<(String, Vec<Option<f64>>)>,
}

impl Frame {
    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// First column carrying `label`.
    pub fn column(&self, label: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, values)| values.as_slice())
    }

    /// Reorder rows ascending by date. A repeated date keeps its last row.
    /// Idempotent.
    pub fn sort_ascending(self) -> Self {
        let mut order: Vec<usize> = (0..self.index.len()).collect();
        order.sort_by_key(|&row| self.index[row]);

        let mut kept: Vec<usize> = Vec::with_capacity(order.len());
        for row in order {
            match kept.last_mut() {
                Some(last) if self.index[*last] == self.index[row] => *last = row,
                _ => kept.push(row),
            }
        }

        let index = kept.iter().map(|&row| self.index[row]).collect();
        let columns = self
            .columns
            .into_iter()
            .map(|(label, values)| {
                let values = kept.iter().map(|&row| values[row]).collect();
                (label, values)
            })
            .collect();

        Frame { index, columns }
    }

    /// Convert to typed bars.
    ///
    /// Rows missing any of open/high/low/close are skipped; a missing volume
    /// counts as zero. An absent open, high or low column leaves those cells
    /// empty, so only an absent close column is an error.
    pub fn into_series(self) -> Result<PriceSeries, MarketError> {
        if self.is_empty() {
            return Ok(PriceSeries::default());
        }

        let open = self.column("open");
        let high = self.column("high");
        let low = self.column("low");
        let close = self.required("close")?;
        let volume = self.column("volume");
        let cell = |column: Option<&[Option<f64>]>, row: usize| column.and_then(|v| finite(v[row]));

        let mut bars = Vec::with_capacity(self.len());
        for (row, date) in self.index.iter().enumerate() {
            let cells = (
                cell(open, row),
                cell(high, row),
                cell(low, row),
                finite(close[row]),
            );
            let (Some(open), Some(high), Some(low), Some(close)) = cells else {
                trace!("Skipping incomplete bar for {}", date);
                continue;
            };

            let volume = volume
                .and_then(|values| finite(values[row]))
                .map(|v| v.max(0.0).round() as u64)
                .unwrap_or(0);

            bars.push(Bar {
                date: *date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        Ok(PriceSeries::from_bars(bars))
    }

    fn required(&self, label: &str) -> Result<&[Option<f64>], MarketError> {
        self.column(label)
            .ok_or_else(|| MarketError::Parse(format!("missing '{}' column", label)))
    }
}

fn finite(cell: Option<f64>) -> Option<f64> {
    cell.filter(|v| v.is_finite())
}
