//! Distribution analysis of the variation column.
//!
//! - Fixed-width binning with the bin count derived from the observed range
//! - Maximum/minimum with the date they occurred
//! - Maximum-likelihood normal fit and its density curve

pub mod histogram;
pub mod normal_fit;
pub mod statistic;

pub use histogram::{bin_count, Histogram, BIN_WIDTH, MAX_BINS};
pub use normal_fit::{linspace, NormalFit, CURVE_POINTS};
pub use statistic::{Extreme, VariationStatistic};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Nothing to bin, or every value identical: the bin count would divide by zero.
    #[error(
        "degenerate variation range: {observations} observation(s) spanning {span} percentage points"
    )]
    DegenerateRange { observations: usize, span: f64 },

    /// Range so wide the fixed bin width would need an unreasonable bin count.
    #[error("variation range of {span} percentage points needs more than {limit} bins")]
    TooManyBins { span: f64, limit: usize },
}
