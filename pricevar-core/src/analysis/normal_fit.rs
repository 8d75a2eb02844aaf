//! Maximum-likelihood normal fit.
//!
//! μ is the sample mean and σ the population standard deviation (divide by n),
//! which are the MLE estimators for a Gaussian.

use super::AnalysisError;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Points at which the fitted density is evaluated for display.
pub const CURVE_POINTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalFit {
    pub mean: f64,
    pub std_dev: f64,
    distribution: Normal,
}

impl NormalFit {
    pub fn fit(values: &[f64]) -> Result<Self, AnalysisError> {
        let degenerate = |span: f64| AnalysisError::DegenerateRange {
            observations: values.len(),
            span,
        };
        if values.is_empty() {
            return Err(degenerate(0.0));
        }

        let mean = values.iter().mean();
        let std_dev = values.iter().population_std_dev();
        let distribution = Normal::new(mean, std_dev).map_err(|_| degenerate(0.0))?;

        Ok(Self {
            mean,
            std_dev,
            distribution,
        })
    }

    pub fn pdf(&self, x: f64) -> f64 {
        self.distribution.pdf(x)
    }

    /// `(x, pdf(x))` at `points` evenly spaced positions over `[min, max]`.
    pub fn curve(&self, min: f64, max: f64, points: usize) -> Vec<(f64, f64)> {
        linspace(min, max, points)
            .into_iter()
            .map(|x| (x, self.pdf(x)))
            .collect()
    }

    /// Legend text shown next to the fitted curve.
    pub fn label(&self) -> String {
        format!("Normal Fit: μ={:.2}, σ={:.2}", self.mean, self.std_dev)
    }
}

/// `n` evenly spaced values from `start` to `end`, both inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_uses_population_std_dev() {
        let fit = NormalFit::fit(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((fit.mean - 5.0).abs() < 1e-12);
        // Sample std would be ~2.138; the MLE is exactly 2.
        assert!((fit.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn pdf_peaks_at_mean() {
        let fit = NormalFit::fit(&[-1.0, 0.0, 1.0]).unwrap();
        let peak = 1.0 / (fit.std_dev * (2.0 * std::f64::consts::PI).sqrt());
        assert!((fit.pdf(0.0) - peak).abs() < 1e-12);
        assert!(fit.pdf(0.5) < fit.pdf(0.0));
    }

    #[test]
    fn constant_values_cannot_be_fitted() {
        assert!(matches!(
            NormalFit::fit(&[3.0, 3.0]),
            Err(AnalysisError::DegenerateRange { observations: 2, .. })
        ));
        assert!(NormalFit::fit(&[]).is_err());
    }

    #[test]
    fn curve_spans_range_with_requested_points() {
        let fit = NormalFit::fit(&[-2.0, 0.0, 2.0]).unwrap();
        let curve = fit.curve(-2.0, 2.0, CURVE_POINTS);
        assert_eq!(curve.len(), 100);
        assert_eq!(curve[0].0, -2.0);
        assert_eq!(curve[99].0, 2.0);
    }

    #[test]
    fn label_rounds_to_two_places() {
        let fit = NormalFit::fit(&[0.0, 1.0]).unwrap();
        assert_eq!(fit.label(), "Normal Fit: μ=0.50, σ=0.50");
    }

    #[test]
    fn linspace_edge_cases() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 5.0, 1), vec![3.0]);
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }
}
