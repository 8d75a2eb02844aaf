//! Raw price history as CSV.
//!
//! Layout: `Date,Open,High,Low,Close,Volume,Dividends,Stock Splits`, one row per
//! session, date first. Dates carry the exchange offset
//! (`2024-01-02 00:00:00-05:00`). Missing prices are empty cells.
//!
//! The same format is accepted back by [`CsvImportProvider`], so a file written
//! by the fetch step can stand in for the remote provider.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::{PriceRecord, PriceSeries, Ticker};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Timestamp format of the `Date` column.
pub const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: Option<f64>,
    #[serde(rename = "High")]
    high: Option<f64>,
    #[serde(rename = "Low")]
    low: Option<f64>,
    #[serde(rename = "Close")]
    close: Option<f64>,
    #[serde(rename = "Volume")]
    volume: u64,
    #[serde(rename = "Dividends", default)]
    dividends: f64,
    #[serde(rename = "Stock Splits", default)]
    stock_splits: f64,
}

fn present(v: f64) -> Option<f64> {
    (!v.is_nan()).then_some(v)
}

impl From<&PriceRecord> for CsvRow {
    fn from(r: &PriceRecord) -> Self {
        Self {
            date: r.timestamp.format(CSV_TIMESTAMP_FORMAT).to_string(),
            open: present(r.open),
            high: present(r.high),
            low: present(r.low),
            close: present(r.close),
            volume: r.volume,
            dividends: r.dividends,
            stock_splits: r.stock_splits,
        }
    }
}

/// Parse the `Date` column. Plain `YYYY-MM-DD` is read as UTC midnight.
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_str(raw, CSV_TIMESTAMP_FORMAT) {
        return Some(ts);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Utc.fix()
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .single()
}

/// Write `series` as CSV with a header row.
pub fn write_series<W: Write>(series: &PriceSeries, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in series.records() {
        wtr.serialize(CsvRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a series previously written by [`write_series`].
///
/// `source` names the input in error messages.
pub fn read_series<R: Read>(ticker: Ticker, reader: R, source: &str) -> Result<PriceSeries, DataError> {
    let import_err = |reason: String| DataError::Import {
        path: source.to_string(),
        reason,
    };

    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| import_err(e.to_string()))?;
        let timestamp = parse_timestamp(&row.date)
            .ok_or_else(|| import_err(format!("row {}: bad date '{}'", line + 1, row.date)))?;
        records.push(PriceRecord {
            timestamp,
            open: row.open.unwrap_or(f64::NAN),
            high: row.high.unwrap_or(f64::NAN),
            low: row.low.unwrap_or(f64::NAN),
            close: row.close.unwrap_or(f64::NAN),
            volume: row.volume,
            dividends: row.dividends,
            stock_splits: row.stock_splits,
        });
    }

    Ok(PriceSeries::new(ticker, records)?)
}

/// Offline provider reading a CSV file chosen by the user.
pub struct CsvImportProvider {
    path: PathBuf,
}

impl CsvImportProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataProvider for CsvImportProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch_history(&self, ticker: &Ticker) -> Result<FetchResult, DataError> {
        let source = self.path.display().to_string();
        let file = File::open(&self.path).map_err(|e| DataError::Import {
            path: source.clone(),
            reason: e.to_string(),
        })?;

        let series = read_series(ticker.clone(), file, &source)?;
        if series.is_empty() {
            return Err(DataError::EmptyResult {
                symbol: ticker.to_string(),
            });
        }

        Ok(FetchResult {
            series,
            source: DataSource::CsvImport,
        })
    }
}
