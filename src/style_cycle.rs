// src/style_cycle.rs

//! Color, marker and line-style cycling for multi-curve plots.

use plotters::style::RGBColor;

/// Marker shapes available for curve points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
    TriangleUp,
    TriangleDown,
    Diamond,
    Cross,
    Plus,
    /// Small filled dot, used for raw data points.
    Point,
}

pub const MARKER_CYCLE: [MarkerShape; 7] = [
    MarkerShape::Circle,
    MarkerShape::Square,
    MarkerShape::TriangleUp,
    MarkerShape::Diamond,
    MarkerShape::TriangleDown,
    MarkerShape::Cross,
    MarkerShape::Plus,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
    Dotted,
    /// Markers only.
    None,
}

pub const LINE_STYLE_CYCLE: [LineStyle; 4] = [
    LineStyle::Solid,
    LineStyle::Dashed,
    LineStyle::DashDot,
    LineStyle::Dotted,
];

/// Marker fill, mirroring the `full` / `none` fill styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillStyle {
    #[default]
    Full,
    None,
}

/// Number of colors in the cycling palette.
pub fn palette_len() -> usize {
    colorous::CATEGORY10.len()
}

pub fn color_code(index: usize) -> RGBColor {
    let c = colorous::CATEGORY10[index % palette_len()];
    RGBColor(c.r, c.g, c.b)
}

pub fn marker_code(index: usize) -> MarkerShape {
    MARKER_CYCLE[index % MARKER_CYCLE.len()]
}

pub fn line_style_code(index: usize) -> LineStyle {
    LINE_STYLE_CYCLE[index % LINE_STYLE_CYCLE.len()]
}

/// Independent cycle positions for color, marker and line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleIndex {
    pub color: usize,
    pub marker: usize,
    pub line_style: usize,
}

impl StyleIndex {
    /// All three cycles driven by one counter.
    pub fn uniform(iter: usize) -> Self {
        StyleIndex {
            color: iter,
            marker: iter,
            line_style: iter,
        }
    }

    /// Moves every cycle forward by one, as done between files.
    pub fn advance(&mut self) {
        self.color += 1;
        self.marker += 1;
        self.line_style += 1;
    }

    pub fn color(&self) -> RGBColor {
        color_code(self.color)
    }

    pub fn marker(&self) -> MarkerShape {
        marker_code(self.marker)
    }

    pub fn line_style(&self) -> LineStyle {
        line_style_code(self.line_style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_wrap() {
        assert_eq!(color_code(0), color_code(palette_len()));
        assert_eq!(marker_code(1), marker_code(1 + MARKER_CYCLE.len()));
        assert_eq!(line_style_code(4), LineStyle::Solid);
        assert_eq!(line_style_code(2), LineStyle::DashDot);
    }

    #[test]
    fn test_advance_moves_all_cycles() {
        let mut index = StyleIndex {
            color: 3,
            marker: 0,
            line_style: 1,
        };
        index.advance();
        assert_eq!(
            index,
            StyleIndex {
                color: 4,
                marker: 1,
                line_style: 2
            }
        );
        assert_eq!(StyleIndex::uniform(2).line_style(), LineStyle::DashDot);
    }
}

// src/style_cycle.rs
