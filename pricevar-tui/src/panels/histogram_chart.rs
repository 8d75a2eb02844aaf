//! Histogram chart - count of days per 0.1-point variation bin
//!
//! Displays:
//! - One bar per bin at the bin center
//! - Vertical reference lines at the maximum and minimum variation
//! - A legend naming both extremes with their dates

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};
use crate::panels::{axis_labels, render_legend, LEGEND_ROWS};
use crate::theme::Theme;
use pricevar_runner::charts::{HistogramPlot, COUNT_AXIS_LABEL, X_AXIS_LABEL};

pub struct HistogramChart<'a> {
    plot: &'a HistogramPlot,
    theme: &'a Theme,
}

impl<'a> HistogramChart<'a> {
    pub fn new(plot: &'a HistogramPlot, theme: &'a Theme) -> Self {
        Self { plot, theme }
    }
}

/// Top of the count axis: even, at least 2, with headroom above the tallest
/// bar, so the three axis labels are all whole numbers.
fn count_axis_top(max_count: u64) -> f64 {
    let half = (max_count as f64 * 1.1 / 2.0).ceil().max(1.0);
    half * 2.0
}

impl<'a> Widget for HistogramChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.plot.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.background));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 10 || inner.height < LEGEND_ROWS + 3 {
            return;
        }
        let [chart_area, legend_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(LEGEND_ROWS)]).areas(inner);

        let hist = &self.plot.histogram;
        let bars: Vec<(f64, f64)> = hist
            .centers()
            .into_iter()
            .zip(hist.counts())
            .map(|(x, &count)| (x, count as f64))
            .collect();

        let y_top = count_axis_top(hist.max_count());
        let max_line = [(self.plot.max, 0.0), (self.plot.max, y_top)];
        let min_line = [(self.plot.min, 0.0), (self.plot.min, y_top)];

        let pad = hist.bin_width();
        let x_bounds = [self.plot.min - pad, self.plot.max + pad];
        let y_bounds = [0.0, y_top];

        let datasets = vec![
            Dataset::default()
                .name("Count")
                .marker(symbols::Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(self.theme.bars))
                .data(&bars),
            Dataset::default()
                .name(self.plot.max_label.as_str())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.max_marker))
                .data(&max_line),
            Dataset::default()
                .name(self.plot.min_label.as_str())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.min_marker))
                .data(&min_line),
        ];

        let axis_title = Style::default().fg(self.theme.text_secondary);
        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title(Span::styled(X_AXIS_LABEL, axis_title))
                    .style(Style::default().fg(self.theme.muted))
                    .bounds(x_bounds)
                    .labels(axis_labels(x_bounds, 1)),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled(COUNT_AXIS_LABEL, axis_title))
                    .style(Style::default().fg(self.theme.muted))
                    .bounds(y_bounds)
                    .labels(axis_labels(y_bounds, 0)),
            )
            .legend_position(None)
            .render(chart_area, buf);

        render_legend(
            legend_area,
            buf,
            &[
                (self.plot.max_label.as_str(), self.theme.max_marker),
                (self.plot.min_label.as_str(), self.theme.min_marker),
            ],
            self.theme.text_primary,
        );

        if legend_area.height > 0 {
            let bins = format!("{} bins ", hist.bin_count());
            let x = legend_area
                .right()
                .saturating_sub(bins.len() as u16);
            buf.set_string(
                x,
                legend_area.y,
                &bins,
                Style::default()
                    .fg(self.theme.muted)
                    .add_modifier(Modifier::ITALIC),
            );
        }
    }
}
