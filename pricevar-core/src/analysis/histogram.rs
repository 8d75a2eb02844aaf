//! Fixed-width histogram binning.
//!
//! The bin count is `floor((max - min) / BIN_WIDTH)`, so it follows the data's
//! own range. Edges are evenly spaced over `[min, max]`; the last bin is closed
//! on the right so the maximum lands in it.

use super::AnalysisError;

/// Bin width in percentage points.
pub const BIN_WIDTH: f64 = 0.1;

/// Upper bound on the bin count, a span of 10,000 percentage points.
pub const MAX_BINS: usize = 100_000;

/// Number of bins for an observed range.
///
/// Fails on a zero-width or non-finite range, and on a range that would need
/// more than [`MAX_BINS`] bins. A range narrower than one bin width still gets
/// a single bin.
pub fn bin_count(min: f64, max: f64) -> Result<usize, AnalysisError> {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return Err(AnalysisError::DegenerateRange {
            observations: 0,
            span: if span.is_finite() { span } else { 0.0 },
        });
    }
    let bins = (span / BIN_WIDTH).floor();
    if bins > MAX_BINS as f64 {
        return Err(AnalysisError::TooManyBins {
            span,
            limit: MAX_BINS,
        });
    }
    Ok((bins as usize).max(1))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
    total: usize,
}

impl Histogram {
    /// Bin `values` using the range-derived bin count.
    pub fn build(values: &[f64]) -> Result<Self, AnalysisError> {
        let (min, max) = range(values).ok_or(AnalysisError::DegenerateRange {
            observations: 0,
            span: 0.0,
        })?;
        let bins = bin_count(min, max).map_err(|e| match e {
            AnalysisError::DegenerateRange { .. } => AnalysisError::DegenerateRange {
                observations: values.len(),
                span: max - min,
            },
            other => other,
        })?;
        Ok(Self::with_bins(values, min, max, bins))
    }

    fn with_bins(values: &[f64], min: f64, max: f64, bins: usize) -> Self {
        let span = max - min;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| min + span * i as f64 / bins as f64)
            .collect();

        let mut counts = vec![0u64; bins];
        for &v in values {
            let idx = (((v - min) / span) * bins as f64) as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Self {
            edges,
            counts,
            total: values.len(),
        }
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    /// Number of values binned.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Actual edge spacing, which is at most `BIN_WIDTH` wider than requested.
    pub fn bin_width(&self) -> f64 {
        (self.edges[self.edges.len() - 1] - self.edges[0]) / self.counts.len() as f64
    }

    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    /// Counts scaled so the bar areas sum to 1.
    pub fn densities(&self) -> Vec<f64> {
        let norm = self.total as f64 * self.bin_width();
        self.counts.iter().map(|&c| c as f64 / norm).collect()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Finite min and max, or `None` when there are no values.
fn range(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}
