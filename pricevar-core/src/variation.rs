//! Percentage daily variation.
//!
//! Sign convention: positive when the session opened above where it closed
//! (price fell), negative when it closed higher.

use crate::domain::{AugmentedRecord, AugmentedSeries, PriceSeries};

/// `100 * (open - close) / open`, evaluated in that order.
pub fn percentage_daily_variation(open: f64, close: f64) -> f64 {
    100.0 * (open - close) / open
}

/// Drop zero-open sessions, derive the variation column, and reduce timestamps to dates.
pub fn compute_variation(series: &PriceSeries) -> AugmentedSeries {
    let records: Vec<AugmentedRecord> = series
        .records()
        .iter()
        .filter(|r| r.open != 0.0)
        .map(|r| {
            let variation = percentage_daily_variation(r.open, r.close);
            AugmentedRecord {
                date: r.date(),
                open: r.open,
                high: r.high,
                low: r.low,
                close: r.close,
                volume: r.volume,
                dividends: r.dividends,
                stock_splits: r.stock_splits,
                percentage_daily_variation: variation.is_finite().then_some(variation),
            }
        })
        .collect();

    let dropped = series.len() - records.len();
    if dropped > 0 {
        tracing::debug!(ticker = %series.ticker(), dropped, "dropped sessions with zero open");
    }

    AugmentedSeries::from_records(series.ticker().clone(), records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PriceRecord, Ticker};
    use chrono::{FixedOffset, TimeZone};

    fn series(rows: &[(f64, f64)]) -> PriceSeries {
        let offset = FixedOffset::west_opt(4 * 3600).unwrap();
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, &(open, close))| PriceRecord {
                timestamp: offset
                    .with_ymd_and_hms(2024, 3, 1 + i as u32, 0, 0, 0)
                    .unwrap(),
                open,
                high: open.max(close),
                low: open.min(close),
                close,
                volume: 100,
                dividends: 0.0,
                stock_splits: 0.0,
            })
            .collect();
        PriceSeries::new(Ticker::parse("TEST").unwrap(), records).unwrap()
    }

    #[test]
    fn drops_zero_open_and_keeps_sign() {
        let augmented = compute_variation(&series(&[(100.0, 101.0), (0.0, 10.0), (50.0, 45.0)]));

        assert_eq!(augmented.len(), 2);
        let variations: Vec<f64> = augmented.variation_values();
        assert_eq!(variations, vec![-1.0, 10.0]);
        assert_eq!(augmented.records()[0].date.to_string(), "2024-03-01");
        assert_eq!(augmented.records()[1].date.to_string(), "2024-03-03");
    }

    #[test]
    fn price_fall_is_positive() {
        assert!(percentage_daily_variation(20.0, 19.0) > 0.0);
        assert!(percentage_daily_variation(20.0, 21.0) < 0.0);
        assert_eq!(percentage_daily_variation(20.0, 20.0), 0.0);
    }

    #[test]
    fn missing_close_yields_missing_variation() {
        let augmented = compute_variation(&series(&[(10.0, f64::NAN), (10.0, 9.0)]));
        assert_eq!(augmented.len(), 2);
        assert_eq!(augmented.records()[0].percentage_daily_variation, None);
        assert_eq!(augmented.variation_values().len(), 1);
    }

    #[test]
    fn timezone_is_stripped_to_local_date() {
        let augmented = compute_variation(&series(&[(10.0, 9.0)]));
        // Local midnight at -04:00 is 04:00 UTC; the date must not shift.
        assert_eq!(augmented.records()[0].date.to_string(), "2024-03-01");
    }
}
