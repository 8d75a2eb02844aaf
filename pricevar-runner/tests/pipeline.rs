//! End-to-end pipeline tests with a fake provider and a recording presenter.
//!
//! No network, no terminal: the provider serves an in-memory series and the
//! presenter keeps the plots it was handed.

use chrono::{FixedOffset, TimeZone};
use pricevar_core::data::{DataError, DataProvider, DataSource, FetchResult};
use pricevar_core::domain::{PriceRecord, PriceSeries, Ticker};
use pricevar_runner::charts::{ChartPresenter, DistributionPlot, HistogramPlot};
use pricevar_runner::{run_pipeline, ErrorKind, OutputPaths};
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

struct FakeProvider {
    sessions: Vec<(f64, f64)>,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn new(sessions: &[(f64, f64)]) -> Self {
        Self {
            sessions: sessions.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl DataProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn fetch_history(&self, ticker: &Ticker) -> Result<FetchResult, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.sessions.is_empty() {
            return Err(DataError::EmptyResult {
                symbol: ticker.to_string(),
            });
        }
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let records = self
            .sessions
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
                volume: 1000 + i as u64,
                dividends: 0.0,
                stock_splits: 0.0,
            })
            .collect();
        Ok(FetchResult {
            series: PriceSeries::new(ticker.clone(), records)?,
            source: DataSource::YahooFinance,
        })
    }
}

#[derive(Default)]
struct RecordingPresenter {
    histograms: Vec<HistogramPlot>,
    distributions: Vec<DistributionPlot>,
}

impl ChartPresenter for RecordingPresenter {
    fn show_histogram(&mut self, plot: &HistogramPlot) -> io::Result<()> {
        self.histograms.push(plot.clone());
        Ok(())
    }

    fn show_distribution(&mut self, plot: &DistributionPlot) -> io::Result<()> {
        self.distributions.push(plot.clone());
        Ok(())
    }
}

struct BrokenPresenter;

impl ChartPresenter for BrokenPresenter {
    fn show_histogram(&mut self, _: &HistogramPlot) -> io::Result<()> {
        Err(io::Error::other("display closed"))
    }

    fn show_distribution(&mut self, _: &DistributionPlot) -> io::Result<()> {
        Ok(())
    }
}

fn pfe() -> Ticker {
    Ticker::parse("pfe").unwrap()
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn three_session_scenario_drops_zero_open() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::new(&[(100.0, 101.0), (0.0, 10.0), (50.0, 45.0)]);
    let mut presenter = RecordingPresenter::default();
    let mut out = Vec::new();

    let report = run_pipeline(&provider, &pfe(), dir.path(), &mut presenter, &mut out).unwrap();

    assert_eq!(report.rows_fetched, 3);
    assert_eq!(report.rows_retained, 2);
    assert_eq!(report.source, DataSource::YahooFinance);
    assert_eq!(
        entries(dir.path()),
        vec![
            "PFE_historical_data.csv".to_string(),
            "PFE_historical_data_with_variation.xlsx".to_string(),
        ]
    );

    let csv = std::fs::read_to_string(&report.raw_csv).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.lines().nth(2).unwrap().starts_with("2024-01-03 00:00:00-05:00,0.0,"));

    assert_eq!(presenter.histograms.len(), 1);
    assert_eq!(presenter.distributions.len(), 1);
    let hist = &presenter.histograms[0];
    assert_eq!(hist.max, 10.0);
    assert_eq!(hist.min, -1.0);
    assert_eq!(hist.max_label, "Max Variation: 10.00% on 2024-01-04");
    assert_eq!(hist.min_label, "Min Variation: -1.00% on 2024-01-02");
    assert_eq!(hist.histogram.total(), 2);

    let fit = &presenter.distributions[0];
    assert_eq!(fit.fit_label, "Normal Fit: μ=4.50, σ=5.50");
}

#[test]
fn echoes_first_records_and_save_path() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::new(&[(100.0, 101.0), (0.0, 10.0), (50.0, 45.0)]);
    let mut out = Vec::new();

    run_pipeline(
        &provider,
        &pfe(),
        dir.path(),
        &mut RecordingPresenter::default(),
        &mut out,
    )
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("2024-01-02 00:00:00-05:00"));
    assert!(lines[2].ends_with("Percentage_Daily_Variation"));
    assert!(lines[3].starts_with("2024-01-02"));
    assert!(lines[3].ends_with("-1.000000"));
    let xlsx = OutputPaths::new(dir.path(), &pfe()).variation_xlsx();
    assert_eq!(lines[4], format!("Data saved to {}", xlsx.display()));
}

#[test]
fn rerun_overwrites_instead_of_appending() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::new(&[(100.0, 101.0), (50.0, 45.0), (20.0, 21.0)]);
    let paths = OutputPaths::new(dir.path(), &pfe());

    run_pipeline(&provider, &pfe(), dir.path(), &mut RecordingPresenter::default(), &mut io::sink())
        .unwrap();
    let first = std::fs::read(paths.raw_csv()).unwrap();

    run_pipeline(&provider, &pfe(), dir.path(), &mut RecordingPresenter::default(), &mut io::sink())
        .unwrap();
    let second = std::fs::read(paths.raw_csv()).unwrap();

    assert_eq!(first, second);
    assert_eq!(entries(dir.path()).len(), 2);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn empty_result_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::new(&[]);
    let mut presenter = RecordingPresenter::default();
    let mut out = Vec::new();

    let err = run_pipeline(&provider, &pfe(), dir.path(), &mut presenter, &mut out).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyResult);
    assert!(entries(dir.path()).is_empty());
    assert!(out.is_empty());
    assert!(presenter.histograms.is_empty());
}

#[test]
fn single_session_is_degenerate_after_files_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::new(&[(100.0, 99.0)]);
    let mut presenter = RecordingPresenter::default();

    let err = run_pipeline(&provider, &pfe(), dir.path(), &mut presenter, &mut io::sink())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DegenerateRange);
    assert_eq!(entries(dir.path()).len(), 2);
    assert!(presenter.histograms.is_empty());
    assert!(presenter.distributions.is_empty());
}

#[test]
fn identical_variations_are_degenerate() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::new(&[(100.0, 99.0), (200.0, 198.0), (50.0, 49.5)]);

    let err = run_pipeline(
        &provider,
        &pfe(),
        dir.path(),
        &mut RecordingPresenter::default(),
        &mut io::sink(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DegenerateRange);
}

#[test]
fn presenter_failure_is_output_error() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::new(&[(100.0, 101.0), (50.0, 45.0)]);

    let err = run_pipeline(&provider, &pfe(), dir.path(), &mut BrokenPresenter, &mut io::sink())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Output);
}

#[test]
fn creates_missing_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("reports").join("pfe");
    let provider = FakeProvider::new(&[(100.0, 101.0), (50.0, 45.0)]);

    run_pipeline(&provider, &pfe(), &nested, &mut RecordingPresenter::default(), &mut io::sink())
        .unwrap();

    assert!(nested.join("PFE_historical_data.csv").is_file());
}
