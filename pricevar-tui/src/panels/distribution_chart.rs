//! Distribution chart - density histogram with the fitted normal curve
//!
//! Bars are scaled so their total area is 1, which puts them on the same
//! axis as the probability density of the fit.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};
use crate::panels::{axis_labels, render_legend, LEGEND_ROWS};
use crate::theme::Theme;
use pricevar_runner::charts::{DistributionPlot, DENSITY_AXIS_LABEL, X_AXIS_LABEL};

pub struct DistributionChart<'a> {
    plot: &'a DistributionPlot,
    theme: &'a Theme,
}

impl<'a> DistributionChart<'a> {
    pub fn new(plot: &'a DistributionPlot, theme: &'a Theme) -> Self {
        Self { plot, theme }
    }
}

impl<'a> Widget for DistributionChart<'a> {
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

        let bars: Vec<(f64, f64)> = self
            .plot
            .histogram
            .centers()
            .into_iter()
            .zip(self.plot.densities.iter().copied())
            .collect();

        let edges = self.plot.histogram.edges();
        let pad = self.plot.histogram.bin_width();
        let x_bounds = [edges[0] - pad, edges[edges.len() - 1] + pad];
        let y_bounds = [0.0, (self.plot.y_max() * 1.1).max(f64::EPSILON)];

        let datasets = vec![
            Dataset::default()
                .name("Density")
                .marker(symbols::Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(self.theme.bars))
                .data(&bars),
            Dataset::default()
                .name(self.plot.fit_label.as_str())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.curve))
                .data(&self.plot.curve),
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
                    .title(Span::styled(DENSITY_AXIS_LABEL, axis_title))
                    .style(Style::default().fg(self.theme.muted))
                    .bounds(y_bounds)
                    .labels(axis_labels(y_bounds, 2)),
            )
            .legend_position(None)
            .render(chart_area, buf);

        render_legend(
            legend_area,
            buf,
            &[
                ("Density histogram", self.theme.bars),
                (self.plot.fit_label.as_str(), self.theme.curve),
            ],
            self.theme.text_primary,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::buffer_text;
    use crate::test_helpers::augmented;

    #[test]
    fn test_distribution_renders_title_and_fit_legend() {
        let theme = Theme::default();
        let plot = DistributionPlot::from_series(&augmented(&[(100.0, 101.0), (50.0, 45.0)])).unwrap();

        let area = Rect::new(0, 0, 120, 40);
        let mut buf = Buffer::empty(area);
        DistributionChart::new(&plot, &theme).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains(
            "Histogram of Percentage Daily Variation with Fitted Normal Distribution"
        ));
        assert!(text.contains("Normal Fit: μ=4.50, σ=5.50"));
        assert!(text.contains("Density histogram"));
    }

    #[test]
    fn test_distribution_tiny_area_renders_without_panic() {
        let theme = Theme::default();
        let plot = DistributionPlot::from_series(&augmented(&[(100.0, 101.0), (50.0, 45.0)])).unwrap();

        let area = Rect::new(0, 0, 12, 5);
        let mut buf = Buffer::empty(area);
        DistributionChart::new(&plot, &theme).render(area, &mut buf);
    }
}
