//! # Chart Rendering
//!
//! Line chart of closing prices against the bar index, encoded as PNG.
//!
//! Every call draws into its own RGB buffer. The bundled font is the only
//! process-wide state and is registered once.

use crate::error::MarketError;
use crate::series::PriceSeries;
use image::{ImageFormat, RgbImage};
use lib_utils::{data_uri, format_iso_date};
use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, Ranged, ValueFormatter};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle, FontTransform};
use std::io::Cursor;
use std::ops::Range;
use std::sync::OnceLock;

const FONT_FAMILY: &str = "sans-serif";

static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

static FONT_REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}

/// Encoded PNG chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub png: Vec<u8>,
}

impl ChartImage {
    /// `data:image/png;base64,...` for inline `<img>` use.
    pub fn data_uri(&self) -> String {
        data_uri("image/png", &self.png)
    }
}

/// Marker radius for `n` points. Fewer points get larger markers.
pub fn marker_size(n: usize) -> u32 {
    match n {
        0..=20 => 6,
        21..=50 => 4,
        51..=100 => 2,
        _ => 1,
    }
}

/// Indices that carry a date label on the x axis.
pub fn tick_positions(n: usize) -> Vec<usize> {
    if n <= 20 {
        (0..n).collect()
    } else {
        (0..n).step_by(n / 10).collect()
    }
}

/// X axis over bar indices `0..n`, padded by half a bar on each side, with
/// labels only at [`tick_positions`].
struct IndexAxis {
    n: usize,
    ticks: Vec<f64>,
}

impl IndexAxis {
    fn new(n: usize) -> Self {
        let ticks = tick_positions(n).into_iter().map(|i| i as f64).collect();
        Self { n, ticks }
    }
}

impl Ranged for IndexAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let range = self.range();
        let span = range.end - range.start;
        let pixels = limit.1 - limit.0;
        if pixels == 0 || span <= 0.0 {
            return limit.1;
        }
        limit.0 + (pixels as f64 * (value - range.start) / span + 1e-3).floor() as i32
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.weight().allow_light_points() {
            Vec::new()
        } else {
            self.ticks.clone()
        }
    }

    fn range(&self) -> Range<f64> {
        -0.5..(self.n as f64 - 0.5)
    }
}

impl ValueFormatter<f64> for IndexAxis {
    fn format(value: &f64) -> String {
        format!("{}", value.round())
    }
}

fn ensure_font() -> Result<(), MarketError> {
    FONT_REGISTERED
        .get_or_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES)
                .map_err(|_| "bundled font could not be loaded".to_string())
        })
        .clone()
        .map_err(MarketError::Chart)
}

fn chart_err(err: impl std::fmt::Display) -> MarketError {
    MarketError::Chart(err.to_string())
}

/// Draw the close-price chart for `series`.
pub fn render_chart(
    ticker: &str,
    series: &PriceSeries,
    options: ChartOptions,
) -> Result<ChartImage, MarketError> {
    if series.is_empty() {
        return Err(MarketError::Chart("cannot chart an empty series".to_string()));
    }
    ensure_font()?;

    let bars = series.bars();
    let n = bars.len();
    let (width, height) = (options.width, options.height);

    let (min, max) = series
        .closes()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| (lo.min(c), hi.max(c)));
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };

    let label_for = |x: &f64| {
        let idx = x.round();
        if idx < 0.0 || idx as usize >= n {
            return String::new();
        }
        format_iso_date(bars[idx as usize].date)
    };
    let price_label = |y: &f64| format!("{:.2}", y);

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("{} Stock Price", ticker.to_uppercase()),
                (FONT_FAMILY, 24),
            )
            .margin(15)
            .x_label_area_size(110)
            .y_label_area_size(80)
            .build_cartesian_2d(IndexAxis::new(n), (min - pad)..(max + pad))
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Price (USD)")
            .x_label_formatter(&label_for)
            .y_label_formatter(&price_label)
            .x_label_style((FONT_FAMILY, 12).into_font().transform(FontTransform::Rotate90))
            .y_label_style((FONT_FAMILY, 12))
            .axis_desc_style((FONT_FAMILY, 14))
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(
                LineSeries::new(
                    series.closes().enumerate().map(|(i, close)| (i as f64, close)),
                    BLUE.filled().stroke_width(2),
                )
                .point_size(marker_size(n)),
            )
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| MarketError::Encode("pixel buffer does not match canvas size".to_string()))?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| MarketError::Encode(e.to_string()))?;

    Ok(ChartImage { png })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::bar;
    use plotters::coord::ranged1d::BoldPoints;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_marker_size_bands() {
        assert_eq!(marker_size(1), 6);
        assert_eq!(marker_size(20), 6);
        assert_eq!(marker_size(21), 4);
        assert_eq!(marker_size(50), 4);
        assert_eq!(marker_size(51), 2);
        assert_eq!(marker_size(100), 2);
        assert_eq!(marker_size(101), 1);
        assert_eq!(marker_size(5000), 1);
    }

    #[test]
    fn test_tick_positions() {
        assert_eq!(tick_positions(0), Vec::<usize>::new());
        assert_eq!(tick_positions(3), vec![0, 1, 2]);
        assert_eq!(tick_positions(20).len(), 20);

        let ticks = tick_positions(250);
        assert_eq!(ticks[1], 25);
        assert!(ticks.len() <= 11);

        let ticks = tick_positions(21);
        assert_eq!(ticks.len(), 11);
    }

    #[test]
    fn test_render_produces_png() {
        let series = PriceSeries::from_bars(vec![bar(1, 152.0), bar(2, 153.0), bar(3, 154.0)]);
        let chart = render_chart("aapl", &series, ChartOptions::default()).unwrap();

        assert!(chart.png.starts_with(&PNG_SIGNATURE));
        assert!(chart.data_uri().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let series = PriceSeries::from_bars((1..=30).map(|n| bar(n, 90.0 + n as f64)).collect());
        let options = ChartOptions {
            width: 320,
            height: 240,
        };

        let first = render_chart("MSFT", &series, options).unwrap();
        let second = render_chart("MSFT", &series, options).unwrap();
        assert_eq!(first.png, second.png);
    }

    #[test]
    fn test_index_axis_key_points() {
        let axis = IndexAxis::new(250);

        assert_eq!(axis.range(), -0.5..249.5);
        let bold = axis.key_points(BoldPoints(11));
        assert_eq!(bold.len(), 10);
        assert_eq!(bold[1], 25.0);
        assert_eq!(axis.map(&-0.5, (0, 500)), 0);
        assert_eq!(axis.map(&249.5, (0, 500)), 500);
    }

    #[test]
    fn test_render_long_series_with_stepped_ticks() {
        let series =
            PriceSeries::from_bars((1..=250).map(|n| bar(n, 100.0 + (n % 17) as f64)).collect());
        let chart = render_chart("SPY", &series, ChartOptions::default()).unwrap();
        assert!(chart.png.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn test_render_flat_series() {
        let series = PriceSeries::from_bars((1..=40).map(|n| bar(n, 10.0)).collect());
        let options = ChartOptions {
            width: 400,
            height: 300,
        };
        let chart = render_chart("FLAT", &series, options).unwrap();
        assert!(chart.png.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn test_render_empty_series_fails() {
        let err = render_chart("AAPL", &PriceSeries::default(), ChartOptions::default()).unwrap_err();
        assert!(matches!(err, MarketError::Chart(_)));
    }

    #[test]
    fn test_concurrent_renders() {
        let handles: Vec<_> = (0..4)
            .map(|k| {
                std::thread::spawn(move || {
                    let series = PriceSeries::from_bars(
                        (1..=10).map(|n| bar(n, 100.0 + (n * k) as f64)).collect(),
                    );
                    render_chart("T", &series, ChartOptions { width: 320, height: 240 })
                })
            })
            .collect();

        for handle in handles {
            let chart = handle.join().unwrap().unwrap();
            assert!(chart.png.starts_with(&PNG_SIGNATURE));
        }
    }
}
