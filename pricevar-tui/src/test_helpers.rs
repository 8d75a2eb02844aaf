//! Shared fixtures for widget and presenter tests.

use chrono::{FixedOffset, TimeZone};
use pricevar_core::domain::{AugmentedSeries, PriceRecord, PriceSeries, Ticker};
use pricevar_core::variation::compute_variation;

/// PFE sessions from 2024-01-02 onward with the given (open, close) pairs.
pub fn augmented(pairs: &[(f64, f64)]) -> AugmentedSeries {
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let records = pairs
        .iter()
        .enumerate()
        .map(|(i, &(open, close))| PriceRecord {
            timestamp: offset
                .with_ymd_and_hms(2024, 1, 2 + i as u32, 0, 0, 0)
                .unwrap(),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: 1,
            dividends: 0.0,
            stock_splits: 0.0,
        })
        .collect();
    compute_variation(&PriceSeries::new(Ticker::parse("PFE").unwrap(), records).unwrap())
}
