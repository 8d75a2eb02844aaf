//! Price series augmented with the percentage daily variation.

use super::ticker::Ticker;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A retained session with its derived variation.
///
/// `open` is never zero here. The timestamp has been reduced to a naive date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub dividends: f64,
    pub stock_splits: f64,
    /// `100 * (open - close) / open`; `None` when a price was missing.
    pub percentage_daily_variation: Option<f64>,
}

impl AugmentedRecord {
    pub fn header() -> String {
        format!(
            "{:<10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>10} {:>12} {:>27}",
            "Date",
            "Open",
            "High",
            "Low",
            "Close",
            "Volume",
            "Dividends",
            "Stock Splits",
            "Percentage_Daily_Variation"
        )
    }
}

impl fmt::Display for AugmentedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variation = match self.percentage_daily_variation {
            Some(v) => format!("{v:.6}"),
            None => "NaN".to_string(),
        };
        write!(
            f,
            "{:<10} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12} {:>10.4} {:>12.4} {:>27}",
            self.date.to_string(),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.dividends,
            self.stock_splits,
            variation
        )
    }
}

/// Immutable result of the variation step.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedSeries {
    ticker: Ticker,
    records: Vec<AugmentedRecord>,
}

impl AugmentedSeries {
    /// Only the variation step builds these, which is what guarantees `open != 0`.
    pub(crate) fn from_records(ticker: Ticker, records: Vec<AugmentedRecord>) -> Self {
        Self { ticker, records }
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn records(&self) -> &[AugmentedRecord] {
        &self.records
    }

    pub fn first(&self) -> Option<&AugmentedRecord> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Non-missing variations paired with their session date, in date order.
    pub fn variations(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.records
            .iter()
            .filter_map(|r| r.percentage_daily_variation.map(|v| (r.date, v)))
    }

    /// Non-missing variation values only.
    pub fn variation_values(&self) -> Vec<f64> {
        self.variations().map(|(_, v)| v).collect()
    }
}
