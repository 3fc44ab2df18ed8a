//! Summary statistics over closing prices.

use crate::series::PriceSeries;
use lib_utils::format_fixed2;

/// Min, max and mean of `close`, at full precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl PriceStats {
    /// `None` for an empty series.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for close in series.closes() {
            min = min.min(close);
            max = max.max(close);
            sum += close;
        }

        // Summation error must not push the mean outside [min, max]
        let mean = (sum / series.len() as f64).clamp(min, max);

        Some(Self { min, max, mean })
    }

    pub fn min_display(&self) -> String {
        format_fixed2(self.min)
    }

    pub fn max_display(&self) -> String {
        format_fixed2(self.max)
    }

    pub fn mean_display(&self) -> String {
        format_fixed2(self.mean)
    }
}
