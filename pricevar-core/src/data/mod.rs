//! Market data retrieval and the raw CSV format

pub mod csv_file;
pub mod provider;
pub mod yahoo;

pub use csv_file::{read_series, write_series, CsvImportProvider, CSV_TIMESTAMP_FORMAT};
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use yahoo::{YahooConfig, YahooProvider};
