//! Daily price records and the series they form.

use super::ticker::Ticker;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One trading session as supplied by the data provider.
///
/// `timestamp` is the session date at local midnight, carrying the exchange's
/// UTC offset. Missing prices are NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub timestamp: DateTime<FixedOffset>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub dividends: f64,
    pub stock_splits: f64,
}

impl PriceRecord {
    /// Calendar date of the session in exchange-local time.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Column header matching the `Display` layout.
    pub fn header() -> String {
        format!(
            "{:<25} {:>12} {:>12} {:>12} {:>12} {:>12} {:>10} {:>12}",
            "Date", "Open", "High", "Low", "Close", "Volume", "Dividends", "Stock Splits"
        )
    }
}

impl fmt::Display for PriceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<25} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12} {:>10.4} {:>12.4}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%:z").to_string(),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.dividends,
            self.stock_splits
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("dates not strictly increasing at row {index}: {previous} followed by {current}")]
    NotIncreasing {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
}

/// Full daily history for one ticker, ordered by date.
///
/// Dates are unique and strictly increasing; the constructor rejects anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: Ticker,
    records: Vec<PriceRecord>,
}

impl PriceSeries {
    pub fn new(ticker: Ticker, records: Vec<PriceRecord>) -> Result<Self, SeriesError> {
        for (index, pair) in records.windows(2).enumerate() {
            let (previous, current) = (pair[0].date(), pair[1].date());
            if current <= previous {
                return Err(SeriesError::NotIncreasing {
                    index: index + 1,
                    previous,
                    current,
                });
            }
        }
        Ok(Self { ticker, records })
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn first(&self) -> Option<&PriceRecord> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(y: i32, m: u32, d: u32) -> PriceRecord {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        PriceRecord {
            timestamp: offset.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
            open: 10.0,
            high: 11.0,
            low: 9.5,
            close: 10.5,
            volume: 1_000,
            dividends: 0.0,
            stock_splits: 0.0,
        }
    }

    #[test]
    fn date_is_exchange_local() {
        let r = record(2024, 1, 2);
        assert_eq!(r.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn series_accepts_increasing_dates() {
        let ticker = Ticker::parse("PFE").unwrap();
        let series =
            PriceSeries::new(ticker, vec![record(2024, 1, 2), record(2024, 1, 3)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first().unwrap().date().to_string(), "2024-01-02");
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let ticker = Ticker::parse("PFE").unwrap();
        let err = PriceSeries::new(ticker, vec![record(2024, 1, 2), record(2024, 1, 2)])
            .unwrap_err();
        assert!(matches!(err, SeriesError::NotIncreasing { index: 1, .. }));
    }

    #[test]
    fn series_rejects_descending_dates() {
        let ticker = Ticker::parse("PFE").unwrap();
        let result = PriceSeries::new(
            ticker,
            vec![record(2024, 1, 3), record(2024, 1, 4), record(2024, 1, 2)],
        );
        assert!(matches!(result, Err(SeriesError::NotIncreasing { index: 2, .. })));
    }

    #[test]
    fn display_row_lines_up_with_header() {
        let row = record(2024, 1, 2).to_string();
        assert!(row.starts_with("2024-01-02 00:00:00-05:00"));
        assert_eq!(row.len(), PriceRecord::header().len());
    }
}
