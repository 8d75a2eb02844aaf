//! Yahoo Finance data provider.
//!
//! Fetches the full daily history (`range=max`) from Yahoo's v8 chart API,
//! including dividend and split events. One request per fetch: failures are
//! reported, never retried.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.
//! The CSV import path is the fallback when Yahoo is unavailable.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::{PriceRecord, PriceSeries, Ticker};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    events: Option<ChartEvents>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(rename = "gmtoffset")]
    gmt_offset: Option<i32>,
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartEvents {
    dividends: Option<HashMap<String, DividendEvent>>,
    splits: Option<HashMap<String, SplitEvent>>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct SplitEvent {
    date: i64,
    numerator: f64,
    denominator: f64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Settings for the Yahoo provider.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Scale OHLC by `adjclose / close` so prices are dividend- and split-adjusted.
    pub auto_adjust: bool,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            auto_adjust: true,
        }
    }
}

/// Exchange time zone used to turn epoch seconds into session dates.
#[derive(Debug, Clone, Copy)]
enum ExchangeZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ExchangeZone {
    fn from_meta(meta: &ChartMeta) -> Self {
        if let Some(tz) = meta
            .exchange_timezone_name
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
        {
            return ExchangeZone::Named(tz);
        }
        let offset = meta
            .gmt_offset
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        ExchangeZone::Fixed(offset)
    }

    /// Local midnight of the session containing `ts`, with that day's offset.
    ///
    /// When midnight falls in a daylight-saving gap, the first valid quarter
    /// hour of that date is used instead.
    fn session(&self, ts: i64) -> Option<DateTime<FixedOffset>> {
        let utc = DateTime::from_timestamp(ts, 0)?;
        match self {
            ExchangeZone::Named(tz) => {
                let midnight = utc.with_timezone(tz).date_naive().and_hms_opt(0, 0, 0)?;
                (0..24 * 4)
                    .map(|q| midnight + chrono::Duration::minutes(15 * q))
                    .find_map(|local| tz.from_local_datetime(&local).earliest())
                    .map(|dt| dt.fixed_offset())
            }
            ExchangeZone::Fixed(offset) => {
                let midnight = utc.with_timezone(offset).date_naive().and_hms_opt(0, 0, 0)?;
                offset.from_local_datetime(&midnight).single()
            }
        }
    }
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    config: YahooConfig,
}

impl YahooProvider {
    pub fn new(config: YahooConfig) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DataError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Build the chart API URL for the full daily history of a symbol.
    fn chart_url(&self, symbol: &str) -> String {
        let encoded = symbol.replace('^', "%5E").replace('=', "%3D");
        format!(
            "{}/v8/finance/chart/{encoded}\
             ?range=max&interval=1d&events=div%2Csplits\
             &includeAdjustedClose=true",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// Parse the chart API response into a validated series.
fn parse_response(
    ticker: &Ticker,
    resp: ChartResponse,
    auto_adjust: bool,
) -> Result<PriceSeries, DataError> {
    let empty = || DataError::EmptyResult {
        symbol: ticker.to_string(),
    };

    let result = match (resp.chart.result, resp.chart.error) {
        (Some(result), _) => result,
        (None, Some(err)) if err.code == "Not Found" => return Err(empty()),
        (None, Some(err)) => {
            return Err(DataError::ResponseFormatChanged(format!(
                "{}: {}",
                err.code, err.description
            )))
        }
        (None, None) => {
            return Err(DataError::ResponseFormatChanged(
                "empty result with no error".into(),
            ))
        }
    };

    let Some(data) = result.into_iter().next() else {
        return Err(empty());
    };
    let zone = ExchangeZone::from_meta(&data.meta);

    // Listed but never traded: Yahoo omits the timestamp array entirely.
    let Some(timestamps) = data.timestamp else {
        return Err(empty());
    };

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

    let adj_closes = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose);

    let (dividends, splits) = collect_events(data.events, &zone);

    let mut records: Vec<PriceRecord> = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let timestamp = zone
            .session(ts)
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?;
        let date = timestamp.date_naive();

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        // Skip rows where all OHLCV are None (holidays/non-trading days)
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none()
        {
            continue;
        }

        let mut record = PriceRecord {
            timestamp,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close.unwrap_or(f64::NAN),
            volume: volume.unwrap_or(0),
            dividends: dividends.get(&date).copied().unwrap_or(0.0),
            stock_splits: splits.get(&date).copied().unwrap_or(0.0),
        };

        if auto_adjust {
            let adj_close = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());
            adjust(&mut record, adj_close);
        }

        // The live session can repeat the last date; the later row wins.
        if records.last().is_some_and(|last| last.date() == date) {
            records.pop();
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(empty());
    }

    Ok(PriceSeries::new(ticker.clone(), records)?)
}

/// Dividend amounts and split ratios keyed by session date.
fn collect_events(
    events: Option<ChartEvents>,
    zone: &ExchangeZone,
) -> (BTreeMap<NaiveDate, f64>, BTreeMap<NaiveDate, f64>) {
    let mut dividends = BTreeMap::new();
    let mut splits = BTreeMap::new();
    let Some(events) = events else {
        return (dividends, splits);
    };

    for event in events.dividends.into_iter().flat_map(|m| m.into_values()) {
        if let Some(session) = zone.session(event.date) {
            *dividends.entry(session.date_naive()).or_insert(0.0) += event.amount;
        }
    }
    for event in events.splits.into_iter().flat_map(|m| m.into_values()) {
        if event.denominator == 0.0 {
            continue;
        }
        if let Some(session) = zone.session(event.date) {
            splits.insert(session.date_naive(), event.numerator / event.denominator);
        }
    }
    (dividends, splits)
}

/// Rescale OHLC by the adjusted-close ratio. Rows without a usable ratio stay raw.
fn adjust(record: &mut PriceRecord, adj_close: Option<f64>) {
    let Some(adj_close) = adj_close else {
        return;
    };
    if !adj_close.is_finite() || !record.close.is_finite() || record.close == 0.0 {
        return;
    }
    let ratio = adj_close / record.close;
    record.open *= ratio;
    record.high *= ratio;
    record.low *= ratio;
    record.close = adj_close;
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_history(&self, ticker: &Ticker) -> Result<FetchResult, DataError> {
        let url = self.chart_url(ticker.as_str());
        tracing::debug!(%url, "requesting chart history");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::EmptyResult {
                symbol: ticker.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Transport(format!("HTTP {status} for {ticker}")));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {ticker}: {e}"))
        })?;

        let series = parse_response(ticker, chart, self.config.auto_adjust)?;
        tracing::debug!(%ticker, rows = series.len(), "parsed chart history");

        Ok(FetchResult {
            series,
            source: DataSource::YahooFinance,
        })
    }
}
