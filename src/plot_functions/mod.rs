// src/plot_functions/mod.rs

use plotters::style::RGBColor;

use crate::constants::{
    DEFAULT_LINE_WIDTH, DEFAULT_MARKER_EDGE_WIDTH, DEFAULT_MARKER_SIZE,
};
use crate::plot_framework::{LegendLocation, LegendSpec, MarkerSpec, PlotSeries};
use crate::style_cycle::{FillStyle, LineStyle, MarkerShape, StyleIndex};

pub mod plot_fit_check_nmr;
pub mod plot_fit_check_sim;
pub mod plot_nmr;
pub mod plot_sweep;
pub mod plot_sweeps;

/// Per-curve drawing settings shared by every plotting operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    pub index: StyleIndex,
    pub fill: FillStyle,
    pub marker_edge_width: f64,
    pub marker_size: u32,
    pub line_width: u32,
    /// `None` hides the legend.
    pub legend: Option<LegendSpec>,
}

impl Default for PlotStyle {
    fn default() -> Self {
        PlotStyle {
            index: StyleIndex::default(),
            fill: FillStyle::Full,
            marker_edge_width: DEFAULT_MARKER_EDGE_WIDTH,
            marker_size: DEFAULT_MARKER_SIZE,
            line_width: DEFAULT_LINE_WIDTH,
            legend: Some(LegendSpec::default()),
        }
    }
}

impl PlotStyle {
    /// Same settings with the legend switched off.
    pub fn without_legend(&self) -> Self {
        PlotStyle {
            legend: None,
            ..self.clone()
        }
    }

    /// Legend placed outside the panel's top-right corner, used by multi-file figures.
    pub fn outside_legend(mut self) -> Self {
        let font_size = self.legend.map(|l| l.font_size).unwrap_or(LegendSpec::default().font_size);
        self.legend = Some(LegendSpec {
            location: LegendLocation::UpperLeft,
            anchor: (1.0, 1.0),
            font_size,
        });
        self
    }

    /// A curve in the current cycle color, marker and line style.
    pub fn cycled_series<'a>(
        &self,
        x: impl IntoIterator<Item = &'a f64>,
        y: impl IntoIterator<Item = &'a f64>,
        label: String,
    ) -> PlotSeries {
        PlotSeries::from_xy(x, y)
            .label(label)
            .color(self.index.color())
            .line(self.index.line_style(), self.line_width)
            .marker(Some(MarkerSpec {
                shape: self.index.marker(),
                size: self.marker_size,
                fill: self.fill,
                edge_width: self.marker_edge_width,
            }))
    }

    /// Unconnected dots, used for raw data and residuals.
    pub fn dots<'a>(
        &self,
        x: impl IntoIterator<Item = &'a f64>,
        y: impl IntoIterator<Item = &'a f64>,
        color: RGBColor,
        size: u32,
    ) -> PlotSeries {
        PlotSeries::from_xy(x, y)
            .color(color)
            .line(LineStyle::None, 0)
            .marker(Some(MarkerSpec {
                shape: MarkerShape::Point,
                size,
                fill: FillStyle::Full,
                edge_width: self.marker_edge_width,
            }))
    }

    /// Line without markers.
    pub fn plain_line<'a>(
        &self,
        x: impl IntoIterator<Item = &'a f64>,
        y: impl IntoIterator<Item = &'a f64>,
        color: RGBColor,
        line_style: LineStyle,
    ) -> PlotSeries {
        PlotSeries::from_xy(x, y)
            .color(color)
            .line(line_style, self.line_width)
    }
}


// src/plot_functions/mod.rs
