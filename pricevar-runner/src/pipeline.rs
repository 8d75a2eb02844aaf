//! The four pipeline stages and the end-to-end run.
//!
//! Stages run strictly in order: fetch, variation, histogram, distribution.
//! Each returns a typed error; nothing here prints diagnostics. The only
//! writes to `out` are the record echoes the user sees on stdout.

use crate::charts::{ChartPresenter, DistributionPlot, HistogramPlot};
use crate::export::{write_price_csv, write_variation_xlsx, ExportError, OutputPaths};
use pricevar_core::data::{DataError, DataProvider, DataSource};
use pricevar_core::domain::{AugmentedRecord, AugmentedSeries, PriceRecord, PriceSeries, Ticker};
use pricevar_core::variation::compute_variation;
use pricevar_core::AnalysisError;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Persistence(#[from] ExportError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("chart output failed: {0}")]
    Output(#[from] io::Error),
}

/// Failure category reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyResult,
    Transport,
    Persistence,
    DegenerateRange,
    Output,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Data(DataError::EmptyResult { .. }) => ErrorKind::EmptyResult,
            Self::Data(_) => ErrorKind::Transport,
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::Analysis(
                AnalysisError::DegenerateRange { .. } | AnalysisError::TooManyBins { .. },
            ) => ErrorKind::DegenerateRange,
            Self::Output(_) => ErrorKind::Output,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub ticker: Ticker,
    pub source: DataSource,
    pub rows_fetched: usize,
    pub rows_retained: usize,
    pub raw_csv: PathBuf,
    pub variation_xlsx: PathBuf,
}

/// Fetch full history, persist it as CSV, and echo the first session.
pub fn fetch_stage(
    provider: &dyn DataProvider,
    ticker: &Ticker,
    paths: &OutputPaths,
    out: &mut dyn Write,
) -> Result<(PriceSeries, DataSource), PipelineError> {
    tracing::info!(ticker = %ticker, provider = provider.name(), "fetching history");
    let fetched = provider.fetch_history(ticker)?;
    let series = fetched.series;
    let Some(first) = series.first() else {
        return Err(DataError::EmptyResult {
            symbol: ticker.to_string(),
        }
        .into());
    };

    write_price_csv(&series, &paths.raw_csv())?;

    writeln!(out, "{}", PriceRecord::header())?;
    writeln!(out, "{first}")?;

    Ok((series, fetched.source))
}

/// Derive the variation column, persist the spreadsheet, and echo its head.
pub fn variation_stage(
    series: &PriceSeries,
    paths: &OutputPaths,
    out: &mut dyn Write,
) -> Result<AugmentedSeries, PipelineError> {
    let augmented = compute_variation(series);
    let path = paths.variation_xlsx();
    write_variation_xlsx(&augmented, &path)?;

    if let Some(first) = augmented.first() {
        writeln!(out, "{}", AugmentedRecord::header())?;
        writeln!(out, "{first}")?;
    }
    writeln!(out, "Data saved to {}", path.display())?;

    tracing::info!(
        ticker = %series.ticker(),
        retained = augmented.len(),
        dropped = series.len() - augmented.len(),
        "computed daily variation"
    );
    Ok(augmented)
}

pub fn histogram_stage(
    augmented: &AugmentedSeries,
    presenter: &mut dyn ChartPresenter,
) -> Result<(), PipelineError> {
    let plot = HistogramPlot::from_series(augmented)?;
    tracing::info!(
        ticker = %augmented.ticker(),
        bins = plot.histogram.bin_count(),
        "showing variation histogram"
    );
    presenter.show_histogram(&plot)?;
    Ok(())
}

pub fn distribution_stage(
    augmented: &AugmentedSeries,
    presenter: &mut dyn ChartPresenter,
) -> Result<(), PipelineError> {
    let plot = DistributionPlot::from_series(augmented)?;
    tracing::info!(
        ticker = %augmented.ticker(),
        mean = plot.fit.mean,
        std_dev = plot.fit.std_dev,
        "showing fitted distribution"
    );
    presenter.show_distribution(&plot)?;
    Ok(())
}

/// Run all four stages for one ticker.
///
/// Creates `output_dir` if needed. Files written by earlier stages stay on
/// disk when a later stage fails.
pub fn run_pipeline(
    provider: &dyn DataProvider,
    ticker: &Ticker,
    output_dir: &Path,
    presenter: &mut dyn ChartPresenter,
    out: &mut dyn Write,
) -> Result<PipelineReport, PipelineError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ExportError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let paths = OutputPaths::new(output_dir, ticker);

    let (series, source) = fetch_stage(provider, ticker, &paths, out)?;
    let augmented = variation_stage(&series, &paths, out)?;
    out.flush()?;

    histogram_stage(&augmented, presenter)?;
    distribution_stage(&augmented, presenter)?;

    Ok(PipelineReport {
        ticker: ticker.clone(),
        source,
        rows_fetched: series.len(),
        rows_retained: augmented.len(),
        raw_csv: paths.raw_csv(),
        variation_xlsx: paths.variation_xlsx(),
    })
}
