//! Chart view models and the presenter seam.
//!
//! The pipeline builds a plain data model for each chart and hands it to a
//! [`ChartPresenter`]. Presenters decide how it reaches the user: a blocking
//! terminal view, a text snapshot on disk, or a recorder in tests.

use pricevar_core::analysis::{Histogram, NormalFit, VariationStatistic, CURVE_POINTS};
use pricevar_core::domain::AugmentedSeries;
use pricevar_core::AnalysisError;
use std::io;

pub const X_AXIS_LABEL: &str = "Percentage Daily Variation (%)";
pub const COUNT_AXIS_LABEL: &str = "Count of Days";
pub const DENSITY_AXIS_LABEL: &str = "Density";

pub const DISTRIBUTION_TITLE: &str =
    "Histogram of Percentage Daily Variation with Fitted Normal Distribution";

/// Count histogram with the two extremes marked.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPlot {
    pub ticker: String,
    pub title: String,
    pub histogram: Histogram,
    pub max: f64,
    pub min: f64,
    pub max_label: String,
    pub min_label: String,
}

impl HistogramPlot {
    pub fn from_series(series: &AugmentedSeries) -> Result<Self, AnalysisError> {
        let stat = VariationStatistic::compute(series)?;
        let histogram = Histogram::build(&series.variation_values())?;
        let ticker = series.ticker().to_string();

        Ok(Self {
            title: format!("Histogram of Percentage Daily Variation of {ticker} Stock"),
            ticker,
            histogram,
            max: stat.max.value,
            min: stat.min.value,
            max_label: stat.max_label(),
            min_label: stat.min_label(),
        })
    }
}

/// Density histogram overlaid with the fitted normal PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionPlot {
    pub ticker: String,
    pub title: String,
    pub histogram: Histogram,
    pub densities: Vec<f64>,
    pub fit: NormalFit,
    /// `(x, pdf(x))` over `[min, max]`.
    pub curve: Vec<(f64, f64)>,
    pub fit_label: String,
}

impl DistributionPlot {
    pub fn from_series(series: &AugmentedSeries) -> Result<Self, AnalysisError> {
        let stat = VariationStatistic::compute(series)?;
        let histogram = Histogram::build(&series.variation_values())?;
        let densities = histogram.densities();
        let curve = stat.fit.curve(stat.min.value, stat.max.value, CURVE_POINTS);

        Ok(Self {
            ticker: series.ticker().to_string(),
            title: DISTRIBUTION_TITLE.to_string(),
            histogram,
            densities,
            fit: stat.fit,
            curve,
            fit_label: stat.fit.label(),
        })
    }

    /// Largest y value across bars and curve, for axis bounds.
    pub fn y_max(&self) -> f64 {
        self.densities
            .iter()
            .copied()
            .chain(self.curve.iter().map(|&(_, y)| y))
            .fold(0.0, f64::max)
    }
}

/// Shows charts to the user.
///
/// Both calls block until the chart has been dismissed or fully written.
pub trait ChartPresenter {
    fn show_histogram(&mut self, plot: &HistogramPlot) -> io::Result<()>;
    fn show_distribution(&mut self, plot: &DistributionPlot) -> io::Result<()>;
}

impl<P: ChartPresenter + ?Sized> ChartPresenter for Box<P> {
    fn show_histogram(&mut self, plot: &HistogramPlot) -> io::Result<()> {
        (**self).show_histogram(plot)
    }

    fn show_distribution(&mut self, plot: &DistributionPlot) -> io::Result<()> {
        (**self).show_distribution(plot)
    }
}
