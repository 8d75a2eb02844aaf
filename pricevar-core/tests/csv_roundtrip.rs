//! Raw CSV write → read reproduces the series.

use chrono::{FixedOffset, TimeZone};
use pricevar_core::data::{read_series, write_series, CsvImportProvider, DataProvider, DataSource};
use pricevar_core::domain::{PriceRecord, PriceSeries, Ticker};

fn record(offset_hours: i32, day: u32, open: f64, close: f64) -> PriceRecord {
    let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
    PriceRecord {
        timestamp: offset.with_ymd_and_hms(2023, 3, day, 0, 0, 0).unwrap(),
        open,
        high: open.max(close) + 0.125,
        low: open.min(close) - 0.0625,
        close,
        volume: 1_000_000 + day as u64,
        dividends: if day == 10 { 0.41 } else { 0.0 },
        stock_splits: 0.0,
    }
}

fn sample() -> PriceSeries {
    PriceSeries::new(
        Ticker::parse("PFE").unwrap(),
        vec![
            // DST change in New York between these sessions
            record(-5, 10, 41.23, 40.98),
            record(-4, 13, 40.98, 41.77),
            record(-4, 14, 0.1 + 0.2, 1.0 / 3.0),
        ],
    )
    .unwrap()
}

#[test]
fn roundtrip_reproduces_values_and_order() {
    let series = sample();
    let mut buf = Vec::new();
    write_series(&series, &mut buf).unwrap();

    let back = read_series(Ticker::parse("PFE").unwrap(), buf.as_slice(), "memory").unwrap();
    assert_eq!(back, series);
}

#[test]
fn roundtrip_keeps_missing_prices_missing() {
    let mut rec = record(-5, 1, 10.0, 11.0);
    rec.close = f64::NAN;
    let series = PriceSeries::new(Ticker::parse("PFE").unwrap(), vec![rec]).unwrap();

    let mut buf = Vec::new();
    write_series(&series, &mut buf).unwrap();
    let back = read_series(Ticker::parse("PFE").unwrap(), buf.as_slice(), "memory").unwrap();

    assert!(back.records()[0].close.is_nan());
    assert_eq!(back.records()[0].open, 10.0);
}

#[test]
fn import_provider_reads_written_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("PFE_historical_data.csv");
    let file = std::fs::File::create(&path).unwrap();
    write_series(&sample(), file).unwrap();

    let provider = CsvImportProvider::new(&path);
    let fetched = provider
        .fetch_history(&Ticker::parse("pfe").unwrap())
        .unwrap();

    assert_eq!(fetched.source, DataSource::CsvImport);
    assert_eq!(fetched.series, sample());
}
