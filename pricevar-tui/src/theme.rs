//! Parrot/neon theme tokens for the chart views
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal
//! - **Bars**: Electric cyan
//! - **Curve**: Neon orange (fitted density)
//! - **Max marker**: Hot pink (largest open-to-close drop)
//! - **Min marker**: Neon green (largest open-to-close gain)
//! - **Muted**: Steel blue (axes, borders)

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Near-black background (primary surface)
    pub background: Color,
    /// Electric cyan histogram bars
    pub bars: Color,
    /// Neon orange fitted curve
    pub curve: Color,
    /// Hot pink reference line at the maximum variation
    pub max_marker: Color,
    /// Neon green reference line at the minimum variation
    pub min_marker: Color,
    /// Cool purple block borders
    pub border: Color,
    /// Steel blue axes
    pub muted: Color,
    /// White (primary text)
    pub text_primary: Color,
    /// Light gray (axis titles, labels)
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            bars: Color::Rgb(0, 255, 255),
            curve: Color::Rgb(255, 140, 0),
            max_marker: Color::Rgb(255, 20, 147),
            min_marker: Color::Rgb(0, 255, 128),
            border: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_creation() {
        let theme = Theme::default();
        assert_eq!(theme.background, Color::Rgb(18, 18, 20));
        assert_eq!(theme.bars, Color::Rgb(0, 255, 255));
    }
}
