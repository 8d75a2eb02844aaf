//! pricevar core: domain types, market data providers, variation and distribution analysis.
//!
//! This crate holds everything that does not touch the filesystem layout or a terminal:
//! - Domain types (tickers, daily price records, augmented series)
//! - Data providers (Yahoo Finance chart API, CSV import) behind one trait
//! - The CSV codec for raw price history
//! - Percentage daily variation
//! - Histogram binning, extremes, and the normal fit

pub mod analysis;
pub mod data;
pub mod domain;
pub mod variation;

pub use analysis::{AnalysisError, Extreme, Histogram, NormalFit, VariationStatistic};
pub use data::{DataError, DataProvider, DataSource, FetchResult};
pub use domain::{AugmentedRecord, AugmentedSeries, PriceRecord, PriceSeries, Ticker};
pub use variation::{compute_variation, percentage_daily_variation};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed between pipeline stages are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Ticker>();
        require_sync::<Ticker>();
        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<AugmentedSeries>();
        require_sync::<AugmentedSeries>();
        require_send::<VariationStatistic>();
        require_sync::<VariationStatistic>();
        require_send::<Histogram>();
        require_sync::<Histogram>();
        require_send::<DataError>();
        require_sync::<DataError>();
    }
}
