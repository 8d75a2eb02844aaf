//! Chart widgets.

pub mod distribution_chart;
pub mod histogram_chart;

pub use distribution_chart::DistributionChart;
pub use histogram_chart::HistogramChart;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
};

/// Rows reserved under each chart for the legend.
pub(crate) const LEGEND_ROWS: u16 = 2;

/// Three evenly spaced axis labels over `bounds`.
pub(crate) fn axis_labels(bounds: [f64; 2], precision: usize) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| format!("{v:.precision$}"))
        .collect()
}

/// One legend entry per row: a colored swatch followed by the label.
///
/// Drawn by hand because the built-in chart legend hides itself when labels
/// are wide relative to the chart.
pub(crate) fn render_legend(area: Rect, buf: &mut Buffer, entries: &[(&str, Color)], text: Color) {
    for (row, (label, color)) in entries.iter().enumerate() {
        let y = area.y + row as u16;
        if y >= area.bottom() {
            break;
        }
        let line = Line::from(vec![
            Span::styled("\u{2501}\u{2501} ", Style::default().fg(*color)), // ━━
            Span::styled(*label, Style::default().fg(text)),
        ]);
        buf.set_line(area.x + 1, y, &line, area.width.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_labels_cover_bounds() {
        assert_eq!(axis_labels([-1.0, 3.0], 1), vec!["-1.0", "1.0", "3.0"]);
        assert_eq!(axis_labels([0.0, 0.5], 2), vec!["0.00", "0.25", "0.50"]);
    }
}
