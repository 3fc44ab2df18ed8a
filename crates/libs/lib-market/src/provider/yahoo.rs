//! # Yahoo Finance Client
//!
//! Reads the public v8 chart endpoint:
//!
//! ```text
//! GET {base}/v8/finance/chart/{TICKER}?period1=..&period2=..&interval=1d&includeAdjustedClose=true
//! ```
//!
//! Bars come back as parallel arrays keyed by Unix timestamp. Each timestamp
//! is shifted by the exchange `gmtoffset` before taking its calendar date.
//! Columns are labelled `(Field, TICKER)`.

use super::MarketDataProvider;
use crate::error::MarketError;
use crate::frame::{ColumnKey, RawColumn, RawFrame};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("stockplot/", env!("CARGO_PKG_VERSION"));

/// Yahoo reports unknown symbols with this error code.
const NOT_FOUND_CODE: &str = "Not Found";

/// A range without trading sessions comes back as a `Bad Request` with this
/// description prefix.
const BAD_REQUEST_CODE: &str = "Bad Request";
const NO_SESSIONS_PREFIX: &str = "Data doesn't exist";

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Replace close with adjusted close and scale open/high/low to match.
    pub auto_adjust: bool,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs,
            auto_adjust: true,
        }
    }
}

/// HTTP client for the Yahoo Finance chart API.
pub struct YahooFinanceClient {
    http: Client,
    config: ProviderConfig,
}

impl YahooFinanceClient {
    pub fn new(config: ProviderConfig) -> Result<Self, MarketError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http, config })
    }

    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Url, MarketError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| MarketError::Url(format!("{}: {}", self.config.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| MarketError::Url(format!("{} cannot be a base", self.config.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);

        url.query_pairs_mut()
            .append_pair("period1", &unix_midnight(start).to_string())
            .append_pair("period2", &unix_midnight(end).to_string())
            .append_pair("interval", "1d")
            .append_pair("includeAdjustedClose", "true");

        Ok(url)
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawFrame, MarketError> {
        let ticker = ticker.trim().to_uppercase();
        let url = self.chart_url(&ticker, start, end)?;
        debug!("Fetching {} bars from {}", ticker, url);

        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let frame = parse_chart(&ticker, status, &body, self.config.auto_adjust)?;
        debug!("Received {} rows for {}", frame.index.len(), ticker);
        Ok(frame)
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

// region: --- Wire types

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

impl ChartError {
    /// Lookup errors that mean "no rows" rather than a provider failure.
    fn is_empty_range(&self) -> bool {
        self.code == NOT_FOUND_CODE
            || (self.code == BAD_REQUEST_CODE && self.description.starts_with(NO_SESSIONS_PREFIX))
    }
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

// endregion: --- Wire types

/// Turn a chart API response into a frame.
pub(crate) fn parse_chart(
    ticker: &str,
    status: u16,
    body: &str,
    auto_adjust: bool,
) -> Result<RawFrame, MarketError> {
    let success = (200..300).contains(&status);

    let envelope: ChartEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !success => return Err(MarketError::Status(status)),
        Err(e) => return Err(MarketError::Parse(e.to_string())),
    };

    if let Some(error) = envelope.chart.error {
        if error.is_empty_range() {
            debug!("No data for {}: {}", ticker, error.description);
            return Ok(RawFrame::empty());
        }
        return Err(MarketError::Api(format!("{}: {}", error.code, error.description)));
    }

    if !success {
        return Err(MarketError::Status(status));
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(RawFrame::empty());
    };

    let timestamps = match result.timestamp {
        Some(ts) if !ts.is_empty() => ts,
        _ => return Ok(RawFrame::empty()),
    };

    let offset = result.meta.gmtoffset;
    let index = timestamps
        .iter()
        .map(|ts| {
            ts.checked_add(offset)
                .and_then(|local| DateTime::from_timestamp(local, 0))
                .map(|dt| dt.date_naive())
                .ok_or_else(|| MarketError::Parse(format!("timestamp {} out of range", ts)))
        })
        .collect::<Result<Vec<NaiveDate>, _>>()?;

    let mut indicators = result.indicators;
    let quote = indicators.quote.drain(..).next().unwrap_or_default();
    let adjclose = indicators.adjclose.drain(..).next().map(|a| a.adjclose);

    let Quote {
        mut open,
        mut high,
        mut low,
        mut close,
        volume,
    } = quote;

    if auto_adjust {
        match adjclose {
            Some(adjclose) => {
                for row in 0..close.len() {
                    let adj = adjclose.get(row).copied().flatten();
                    let ratio = match (adj, close[row]) {
                        (Some(adj), Some(raw)) if raw != 0.0 => adj / raw,
                        _ => {
                            close[row] = None;
                            continue;
                        }
                    };
                    for column in [&mut open, &mut high, &mut low] {
                        if let Some(cell) = column.get_mut(row) {
                            *cell = cell.map(|v| v * ratio);
                        }
                    }
                    close[row] = adj;
                }
            }
            None => warn!("No adjusted close for {}, using raw prices", ticker),
        }
    }

    let key = |field: &str| ColumnKey::Composite(vec![field.to_string(), ticker.to_string()]);

    Ok(RawFrame {
        index,
        columns: vec![
            RawColumn::new(key("Open"), open),
            RawColumn::new(key("High"), high),
            RawColumn::new(key("Low"), low),
            RawColumn::new(key("Close"), close),
            RawColumn::new(key("Volume"), volume),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-01-03/04/05 14:30 UTC, New York offset
    const THREE_DAYS: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "USD", "symbol": "AAPL", "gmtoffset": -18000},
                "timestamp": [1672756200, 1672842600, 1672929000],
                "indicators": {
                    "quote": [{
                        "open": [150.0, 151.0, 152.0],
                        "high": [155.0, 156.0, 157.0],
                        "low": [149.0, 150.0, 151.0],
                        "close": [152.0, 153.0, 154.0],
                        "volume": [1000, 1100, null]
                    }],
                    "adjclose": [{"adjclose": [76.0, 153.0, 154.0]}]
                }
            }],
            "error": null
        }
    }"#;

    const NOT_FOUND: &str = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn client(base_url: &str) -> YahooFinanceClient {
        YahooFinanceClient::new(ProviderConfig::new(base_url, 5)).unwrap()
    }

    #[test]
    fn test_chart_url() {
        let url = client("https://query1.finance.yahoo.com")
            .chart_url("AAPL", date("2023-01-01"), date("2023-01-31"))
            .unwrap();

        assert_eq!(url.path(), "/v8/finance/chart/AAPL");
        let query = url.query().unwrap();
        assert!(query.contains("period1=1672531200"));
        assert!(query.contains("period2=1675123200"));
        assert!(query.contains("interval=1d"));
        assert!(query.contains("includeAdjustedClose=true"));
    }

    #[test]
    fn test_chart_url_escapes_ticker() {
        let url = client("http://localhost:9000/")
            .chart_url("BRK/B", date("2023-01-01"), date("2023-01-02"))
            .unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/BRK%2FB");
    }

    #[test]
    fn test_chart_url_rejects_bad_base() {
        let err = client("not a url")
            .chart_url("AAPL", date("2023-01-01"), date("2023-01-02"))
            .unwrap_err();
        assert!(matches!(err, MarketError::Url(_)));
    }

    #[test]
    fn test_parse_raw_prices() {
        let frame = parse_chart("AAPL", 200, THREE_DAYS, false).unwrap();

        assert_eq!(frame.index, vec![date("2023-01-03"), date("2023-01-04"), date("2023-01-05")]);
        assert_eq!(
            frame.columns[3].key,
            ColumnKey::Composite(vec!["Close".into(), "AAPL".into()])
        );
        assert_eq!(frame.columns[3].values, vec![Some(152.0), Some(153.0), Some(154.0)]);
        assert_eq!(frame.columns[4].values[2], None);
    }

    #[test]
    fn test_parse_auto_adjusts() {
        let frame = parse_chart("AAPL", 200, THREE_DAYS, true).unwrap();

        // First row has a 0.5 ratio
        assert_eq!(frame.columns[0].values[0], Some(75.0));
        assert_eq!(frame.columns[1].values[0], Some(77.5));
        assert_eq!(frame.columns[3].values[0], Some(76.0));
        assert_eq!(frame.columns[3].values[1], Some(153.0));
    }

    #[test]
    fn test_not_found_is_empty() {
        let frame = parse_chart("ZZZZ", 404, NOT_FOUND, true).unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn test_range_without_sessions_is_empty() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Data doesn't exist for startDate = 1672704000, endDate = 1672704000"}}}"#;
        let frame = parse_chart("AAPL", 400, body, true).unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn test_gmtoffset_overflow_is_parse_error() {
        let body = format!(
            r#"{{"chart":{{"result":[{{"meta":{{"gmtoffset":{}}},"timestamp":[1672756200],"indicators":{{"quote":[{{"close":[1.0]}}]}}}}],"error":null}}}}"#,
            i64::MAX
        );
        let err = parse_chart("AAPL", 200, &body, true).unwrap_err();
        assert!(matches!(err, MarketError::Parse(_)));
    }

    #[test]
    fn test_missing_timestamps_is_empty() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(parse_chart("AAPL", 200, body, true).unwrap().is_empty());
    }

    #[test]
    fn test_other_api_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        let err = parse_chart("AAPL", 400, body, true).unwrap_err();
        assert!(matches!(err, MarketError::Api(msg) if msg.starts_with("Bad Request")));
    }

    #[test]
    fn test_non_json_error_status() {
        let err = parse_chart("AAPL", 503, "<html>unavailable</html>", true).unwrap_err();
        assert!(matches!(err, MarketError::Status(503)));
    }

    #[test]
    fn test_malformed_success_body() {
        let err = parse_chart("AAPL", 200, "{\"nope\":1}", true).unwrap_err();
        assert!(matches!(err, MarketError::Parse(_)));
    }
}
