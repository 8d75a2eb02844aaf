//! pricevar runner: configuration, output files, chart models, pipeline.
//!
//! This crate builds on `pricevar-core` to provide:
//! - `AppConfig` loaded from TOML with defaults
//! - Output file naming and replace-on-write exporters (CSV, XLSX, snapshots)
//! - View models for the two charts and the `ChartPresenter` seam
//! - The fetch, variation, histogram, and distribution stages

pub mod charts;
pub mod config;
pub mod export;
pub mod pipeline;

pub use charts::{ChartPresenter, DistributionPlot, HistogramPlot};
pub use config::{AppConfig, ChartConfig, ConfigError, DisplayMode, ProviderConfig};
pub use export::{ExportError, OutputPaths};
pub use pipeline::{
    distribution_stage, fetch_stage, histogram_stage, run_pipeline, variation_stage, ErrorKind,
    PipelineError, PipelineReport,
};
