//! pricevar TUI: terminal and snapshot rendering of the variation charts.
//!
//! Provides:
//! - Ratatui widgets for the count histogram and the fitted distribution
//! - A blocking full-screen presenter for interactive terminals
//! - A snapshot presenter that renders into an off-screen buffer and writes text files

pub mod panels;
pub mod presenter;
pub mod theme;

pub use panels::{DistributionChart, HistogramChart};
pub use presenter::{buffer_text, presenter_for, render_to_text, SnapshotPresenter, TerminalPresenter};
pub use theme::Theme;

#[cfg(test)]
mod test_helpers;
