//! Domain types for pricevar

pub mod augmented;
pub mod record;
pub mod ticker;

pub use augmented::{AugmentedRecord, AugmentedSeries};
pub use record::{PriceRecord, PriceSeries, SeriesError};
pub use ticker::{Ticker, TickerError};
