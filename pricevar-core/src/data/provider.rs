//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV import)
//! so the fetch step can swap implementations and tests can use a fake.

use crate::domain::{PriceSeries, SeriesError, Ticker};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// The provider answered but had no sessions for the ticker.
    #[error("no data found for the ticker '{symbol}'. Please check the ticker symbol.")]
    EmptyResult { symbol: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("invalid series: {0}")]
    Validation(#[from] SeriesError),

    #[error("csv import failed for {path}: {reason}")]
    Import { path: String, reason: String },
}

impl DataError {
    /// True for failures of the retrieval mechanism itself rather than of the data.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DataError::Transport(_) | DataError::ResponseFormatChanged(_)
        )
    }
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
}

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub series: PriceSeries,
    pub source: DataSource,
}

/// A source of full daily history for one ticker.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch every daily session the source has for `ticker`.
    ///
    /// Implementations return `DataError::EmptyResult` rather than an empty series.
    fn fetch_history(&self, ticker: &Ticker) -> Result<FetchResult, DataError>;
}
