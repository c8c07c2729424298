// src/plot_framework.rs

use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, ChartContext};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{
    Circle, Cross, EmptyElement, PathElement, Polygon, Rectangle, Text, TriangleMarker,
};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor, ShapeStyle};

use std::error::Error;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use crate::constants::{
    DASH_GAP_PX, DASH_LENGTH_PX, DEFAULT_LEGEND_SIZE, DOT_LENGTH_PX, FIGURE_DPI, FONT_FAMILY,
    FONT_SIZE_AXIS_LABEL, FONT_SIZE_MAIN_TITLE, FONT_SIZE_MESSAGE, GRID_COLOR,
    LEGEND_POINT_TO_PX, MAX_PANEL_GAP_FRACTION,
};
use crate::error::{RenderError, RenderResult};
use crate::style_cycle::{FillStyle, LineStyle, MarkerShape};

const LINE_WIDTH_LEGEND: u32 = 2;
const LEGEND_GLYPH_PX: i32 = 20;
const LEGEND_PAD_PX: i32 = 5;
const LEGEND_ROW_GAP_PX: i32 = 6;
const LEGEND_CHAR_WIDTH_RATIO: f64 = 0.6;

const CHART_MARGIN_PX: u32 = 5;
const X_LABEL_AREA_PX: u32 = 50;
const Y_LABEL_AREA_PX: u32 = 70;

/// Tick values closer to zero than this fraction of the axis span are labelled 0.
const TICK_ZERO_FRACTION: f64 = 1e-9;

/// Index of a series inside its panel.
pub type SeriesHandle = usize;

type PanelChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Calculate plot range with padding.
/// Adds 15% padding, or half the value's magnitude (0.5 around zero) for degenerate ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = max - min;
    let magnitude = max.abs().max(min.abs());
    let padding = if range > 1e-12 * magnitude {
        range * 0.15
    } else if magnitude > 0.0 {
        0.5 * magnitude
    } else {
        0.5
    };
    (min - padding, max + padding)
}

/// Tick label text: k/M suffixes for large values, scientific notation for tiny ones.
pub fn format_tick_label(v: f64) -> String {
    let a = v.abs();
    if v == 0.0 {
        "0".to_string()
    } else if a >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if a >= 1000.0 {
        format!("{:.1}k", v / 1000.0)
    } else if a < 0.01 {
        format!("{:.1e}", v)
    } else if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// Snaps rounding noise around zero to zero, e.g. a `-5.6e-17` tick on a ±0.1 axis.
pub fn snap_tick(v: f64, span: f64) -> f64 {
    if v.abs() <= span.abs() * TICK_ZERO_FRACTION {
        0.0
    } else {
        v
    }
}

/// Scientific tick label, used where the x axis is forced to `sci` style.
pub fn format_sci_label(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else {
        format!("{:.1e}", v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSpec {
    pub shape: MarkerShape,
    pub size: u32,
    pub fill: FillStyle,
    pub edge_width: f64,
}

#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
    pub line_style: LineStyle,
    pub marker: Option<MarkerSpec>,
}

impl PlotSeries {
    /// Pairs `x` and `y` point by point; the shorter one decides the length.
    pub fn from_xy<'a>(
        x: impl IntoIterator<Item = &'a f64>,
        y: impl IntoIterator<Item = &'a f64>,
    ) -> Self {
        PlotSeries {
            data: x.into_iter().copied().zip(y.into_iter().copied()).collect(),
            label: String::new(),
            color: BLACK,
            stroke_width: 1,
            line_style: LineStyle::Solid,
            marker: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn color(mut self, color: RGBColor) -> Self {
        self.color = color;
        self
    }

    pub fn line(mut self, line_style: LineStyle, stroke_width: u32) -> Self {
        self.line_style = line_style;
        self.stroke_width = stroke_width;
        self
    }

    pub fn marker(mut self, marker: Option<MarkerSpec>) -> Self {
        self.marker = marker;
        self
    }

    fn finite_points(&self) -> Vec<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLocation {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
    UpperCenter,
    LowerCenter,
    Center,
}

impl FromStr for LegendLocation {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "upper left" => Ok(LegendLocation::UpperLeft),
            "upper right" | "best" => Ok(LegendLocation::UpperRight),
            "lower left" => Ok(LegendLocation::LowerLeft),
            "lower right" => Ok(LegendLocation::LowerRight),
            "upper center" => Ok(LegendLocation::UpperCenter),
            "lower center" => Ok(LegendLocation::LowerCenter),
            "center" => Ok(LegendLocation::Center),
            _ => Err(RenderError::UnknownLegendLocation {
                name: s.to_string(),
            }),
        }
    }
}

/// Legend placement: the `location` corner of the legend box sits at `anchor`,
/// given in fractions of the plotting area with (0, 0) at its lower left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendSpec {
    pub location: LegendLocation,
    pub anchor: (f64, f64),
    pub font_size: u32,
}

impl Default for LegendSpec {
    fn default() -> Self {
        LegendSpec {
            location: LegendLocation::LowerLeft,
            anchor: (0.0, 1.0),
            font_size: DEFAULT_LEGEND_SIZE,
        }
    }
}

/// Top-left pixel of the legend box inside a plotting area of `plot_size`.
pub fn legend_origin(
    spec: &LegendSpec,
    plot_size: (u32, u32),
    legend_size: (u32, u32),
) -> (i32, i32) {
    let (w, h) = (plot_size.0 as f64, plot_size.1 as f64);
    let (lw, lh) = (legend_size.0 as f64, legend_size.1 as f64);
    let ax = spec.anchor.0 * w;
    let ay = (1.0 - spec.anchor.1) * h;
    let (x, y) = match spec.location {
        LegendLocation::UpperLeft => (ax, ay),
        LegendLocation::UpperRight => (ax - lw, ay),
        LegendLocation::LowerLeft => (ax, ay - lh),
        LegendLocation::LowerRight => (ax - lw, ay - lh),
        LegendLocation::UpperCenter => (ax - lw / 2.0, ay),
        LegendLocation::LowerCenter => (ax - lw / 2.0, ay - lh),
        LegendLocation::Center => (ax - lw / 2.0, ay - lh / 2.0),
    };
    (x.round() as i32, y.round() as i32)
}

/// Pixel geometry of a legend box: one row per entry, glyph then label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendLayout {
    pub font_px: i32,
    pub row_px: i32,
    pub size: (u32, u32),
}

impl LegendLayout {
    pub fn new(spec: &LegendSpec, labels: &[&str]) -> Self {
        let font_px = ((spec.font_size as f64 * LEGEND_POINT_TO_PX).round() as i32).max(1);
        let row_px = font_px + LEGEND_ROW_GAP_PX;
        let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let text_px = (longest as f64 * font_px as f64 * LEGEND_CHAR_WIDTH_RATIO).ceil() as i32;
        let width = 3 * LEGEND_PAD_PX + LEGEND_GLYPH_PX + text_px;
        let height = 2 * LEGEND_PAD_PX + labels.len() as i32 * row_px;
        LegendLayout {
            font_px,
            row_px,
            size: (width as u32, height as u32),
        }
    }
}

/// Room the legend needs outside the plotting area, as `(top, right, bottom, left)`.
pub fn legend_overflow(
    spec: &LegendSpec,
    plot_size: (u32, u32),
    legend_size: (u32, u32),
) -> (u32, u32, u32, u32) {
    let (x, y) = legend_origin(spec, plot_size, legend_size);
    let right = x + legend_size.0 as i32 - plot_size.0 as i32;
    let bottom = y + legend_size.1 as i32 - plot_size.1 as i32;
    (
        (-y).max(0) as u32,
        right.max(0) as u32,
        bottom.max(0) as u32,
        (-x).max(0) as u32,
    )
}

/// Shifts a legend origin so the whole box stays inside an area of `area_size`.
pub fn clamp_legend_origin(
    origin: (i32, i32),
    legend_size: (u32, u32),
    area_size: (u32, u32),
) -> (i32, i32) {
    let max_x = (area_size.0 as i32 - legend_size.0 as i32).max(0);
    let max_y = (area_size.1 as i32 - legend_size.1 as i32).max(0);
    (origin.0.clamp(0, max_x), origin.1.clamp(0, max_y))
}

/// One set of axes holding any number of curves.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    pub series: Vec<PlotSeries>,
    pub x_label: String,
    pub y_label: String,
    pub legend: Option<LegendSpec>,
    pub grid: bool,
    pub sci_x_ticks: bool,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_series(&mut self, series: PlotSeries) -> SeriesHandle {
        self.series.push(series);
        self.series.len() - 1
    }

    pub fn set_labels(&mut self, x_label: &str, y_label: &str) {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
    }

    pub fn has_data(&self) -> bool {
        self.series.iter().any(|s| !s.finite_points().is_empty())
    }

    /// Bounds of all finite points: `((x_min, x_max), (y_min, y_max))`.
    pub fn data_bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut bounds: Option<((f64, f64), (f64, f64))> = None;
        for (x, y) in self.series.iter().flat_map(|s| s.finite_points()) {
            bounds = Some(match bounds {
                None => ((x, x), (y, y)),
                Some(((x0, x1), (y0, y1))) => ((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y))),
            });
        }
        bounds
    }

    /// Axis ranges: exact in x unless degenerate, padded in y.
    pub fn ranges(&self) -> Option<(Range<f64>, Range<f64>)> {
        let ((x0, x1), (y0, y1)) = self.data_bounds()?;
        let (x0, x1) = if x1 - x0 > 0.0 {
            (x0, x1)
        } else {
            calculate_range(x0, x1)
        };
        let (y0, y1) = calculate_range(y0, y1);
        Some((x0..x1, y0..y1))
    }
}

/// A grid of panels rendered into one image.
#[derive(Debug, Clone)]
pub struct Figure {
    pub root_name: String,
    pub rows: usize,
    pub cols: usize,
    pub panels: Vec<Panel>,
    /// Width and height in inches.
    pub size_in: (f64, f64),
    pub wspace: f64,
    pub hspace: f64,
}

impl Figure {
    pub fn new(root_name: &str, rows: usize, cols: usize, size_in: (f64, f64)) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Figure {
            root_name: root_name.to_string(),
            rows,
            cols,
            panels: vec![Panel::new(); rows * cols],
            size_in,
            wspace: 0.2,
            hspace: 0.2,
        }
    }

    pub fn spacing(mut self, wspace: f64, hspace: f64) -> Self {
        self.wspace = wspace;
        self.hspace = hspace;
        self
    }

    pub fn panel(&self, row: usize, col: usize) -> &Panel {
        &self.panels[row * self.cols + col]
    }

    pub fn panel_mut(&mut self, row: usize, col: usize) -> &mut Panel {
        &mut self.panels[row * self.cols + col]
    }

    /// All panels, flattened row by row.
    pub fn panels_mut(&mut self) -> &mut [Panel] {
        &mut self.panels
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.size_in.0 * FIGURE_DPI).round().max(1.0) as u32,
            (self.size_in.1 * FIGURE_DPI).round().max(1.0) as u32,
        )
    }
}

/// Checks that at least `expected` panels were handed in.
pub fn require_panels(panels: &[Panel], expected: usize) -> RenderResult<()> {
    if panels.len() < expected {
        return Err(RenderError::PanelCount {
            expected,
            got: panels.len(),
        });
    }
    Ok(())
}

/// Margin on each side of a panel for the requested relative spacing.
pub fn panel_gap_px(extent_px: u32, spacing: f64) -> u32 {
    let spacing = if spacing.is_finite() { spacing.clamp(0.0, 1.0) } else { 0.0 };
    (extent_px as f64 * spacing * MAX_PANEL_GAP_FRACTION / 2.0).round() as u32
}

/// Splits a polyline into the visible pieces of an on/off dash pattern.
pub fn dash_polyline(points: &[(f64, f64)], pattern: &[f64]) -> Vec<Vec<(f64, f64)>> {
    if points.len() < 2 || pattern.is_empty() || pattern.iter().any(|&p| !(p > 0.0)) {
        return vec![points.to_vec()];
    }
    let mut segments = Vec::new();
    let mut current = vec![points[0]];
    let mut on = true;
    let mut idx = 0;
    let mut remaining = pattern[0];

    for w in points.windows(2) {
        let (mut ax, mut ay) = w[0];
        let (bx, by) = w[1];
        let mut seg_len = (bx - ax).hypot(by - ay);
        while seg_len > remaining {
            let t = remaining / seg_len;
            let p = (ax + (bx - ax) * t, ay + (by - ay) * t);
            if on {
                current.push(p);
                segments.push(std::mem::take(&mut current));
            } else {
                current = vec![p];
            }
            on = !on;
            idx = (idx + 1) % pattern.len();
            seg_len -= remaining;
            remaining = pattern[idx];
            ax = p.0;
            ay = p.1;
        }
        remaining -= seg_len;
        if on {
            current.push((bx, by));
        }
    }
    if on && current.len() >= 2 {
        segments.push(current);
    }
    segments
}

fn dash_pattern(style: LineStyle) -> Option<Vec<f64>> {
    match style {
        LineStyle::Dashed => Some(vec![DASH_LENGTH_PX, DASH_GAP_PX]),
        LineStyle::DashDot => Some(vec![DASH_LENGTH_PX, DASH_GAP_PX, DOT_LENGTH_PX, DASH_GAP_PX]),
        LineStyle::Dotted => Some(vec![DOT_LENGTH_PX, DASH_GAP_PX]),
        LineStyle::Solid | LineStyle::None => None,
    }
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, Shift>,
    panel_index: usize,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    // Constants for text rendering
    const CHAR_WIDTH_RATIO: f32 = 0.6; // Approximate character width relative to font size
    const LINE_HEIGHT_SPACING: i32 = 4; // Additional spacing between lines

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (
        (x_range.end - x_range.start) as u32,
        (y_range.end - y_range.start) as u32,
    );
    let message = format!("Panel {} Data Unavailable:\n{reason}", panel_index + 1);

    let estimated_char_width = (FONT_SIZE_MESSAGE as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = FONT_SIZE_MESSAGE + LINE_HEIGHT_SPACING;

    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.len()).max().unwrap_or(0);
    let estimated_text_width = max_line_length.saturating_mul(estimated_char_width as usize) as i32;
    let estimated_text_height = lines.len().saturating_mul(estimated_line_height as usize) as i32;

    let center_x = width as i32 / 2 - estimated_text_width / 2;
    let center_y = height as i32 / 2 - estimated_text_height / 2;

    let text_style = (FONT_FAMILY, FONT_SIZE_MESSAGE).into_font().color(&RED);
    for (i, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.to_string(),
            (center_x, center_y + i as i32 * estimated_line_height),
            text_style.clone(),
        ))?;
    }
    Ok(())
}

fn marker_style(color: RGBColor, spec: &MarkerSpec) -> ShapeStyle {
    match spec.fill {
        FillStyle::Full => color.filled(),
        FillStyle::None => color.stroke_width(spec.edge_width.round().max(1.0) as u32),
    }
}

fn draw_markers(
    chart: &mut PanelChart<'_, '_>,
    points: &[(f64, f64)],
    color: RGBColor,
    spec: &MarkerSpec,
) -> Result<(), Box<dyn Error>> {
    let style = marker_style(color, spec);
    let s = spec.size as i32;
    let pts = points.iter().copied();
    match spec.shape {
        MarkerShape::Circle => {
            chart.draw_series(pts.map(|c| Circle::new(c, s, style)))?;
        }
        MarkerShape::Point => {
            chart.draw_series(pts.map(|c| Circle::new(c, (s / 2).max(1), color.filled())))?;
        }
        MarkerShape::Square => {
            chart.draw_series(
                pts.map(|c| EmptyElement::at(c) + Rectangle::new([(-s, -s), (s, s)], style)),
            )?;
        }
        MarkerShape::TriangleUp => {
            chart.draw_series(pts.map(|c| TriangleMarker::new(c, s, style)))?;
        }
        MarkerShape::TriangleDown => {
            chart.draw_series(pts.map(|c| {
                EmptyElement::at(c) + Polygon::new(vec![(-s, -s), (s, -s), (0, s)], style)
            }))?;
        }
        MarkerShape::Diamond => {
            chart.draw_series(pts.map(|c| {
                EmptyElement::at(c) + Polygon::new(vec![(0, -s), (s, 0), (0, s), (-s, 0)], style)
            }))?;
        }
        MarkerShape::Cross => {
            chart.draw_series(pts.map(|c| Cross::new(c, s, style)))?;
        }
        MarkerShape::Plus => {
            chart.draw_series(pts.map(|c| {
                EmptyElement::at(c)
                    + PathElement::new(vec![(-s, 0), (s, 0)], style)
                    + PathElement::new(vec![(0, -s), (0, s)], style)
            }))?;
        }
    }
    Ok(())
}

fn draw_line(
    area: &DrawingArea<BitMapBackend, Shift>,
    chart: &mut PanelChart<'_, '_>,
    points: &[(f64, f64)],
    color: RGBColor,
    stroke_width: u32,
    line_style: LineStyle,
) -> Result<(), Box<dyn Error>> {
    if line_style == LineStyle::None || stroke_width == 0 || points.len() < 2 {
        return Ok(());
    }
    let style = color.stroke_width(stroke_width);
    match dash_pattern(line_style) {
        None => {
            chart.draw_series(LineSeries::new(points.iter().copied(), style))?;
        }
        Some(pattern) => {
            // Dashes are laid out in pixel space so they look the same on every axis scale.
            let offset = area.get_base_pixel();
            let pixels: Vec<(f64, f64)> = points
                .iter()
                .map(|p| {
                    let (px, py) = chart.backend_coord(p);
                    ((px - offset.0) as f64, (py - offset.1) as f64)
                })
                .collect();
            for segment in dash_polyline(&pixels, &pattern) {
                let segment: Vec<(i32, i32)> = segment
                    .iter()
                    .map(|&(x, y)| (x.round() as i32, y.round() as i32))
                    .collect();
                area.draw(&PathElement::new(segment, style))?;
            }
        }
    }
    Ok(())
}

/// Draws one panel: mesh, curves, markers and legend.
fn draw_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    panel: &Panel,
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> Result<(), Box<dyn Error>> {
    let entries: Vec<&PlotSeries> = panel
        .series
        .iter()
        .filter(|s| !s.label.is_empty() && !s.finite_points().is_empty())
        .collect();
    let legend = match &panel.legend {
        Some(spec) if !entries.is_empty() => {
            let labels: Vec<&str> = entries.iter().map(|s| s.label.as_str()).collect();
            Some((spec, LegendLayout::new(spec, &labels)))
        }
        _ => None,
    };

    // Legends outside the axes get their room from the chart margins.
    let (aw, ah) = area.dim_in_pixel();
    let (top, right, bottom, left) = match &legend {
        Some((spec, layout)) => {
            let plot_estimate = (
                aw.saturating_sub(2 * CHART_MARGIN_PX + Y_LABEL_AREA_PX),
                ah.saturating_sub(2 * CHART_MARGIN_PX + X_LABEL_AREA_PX),
            );
            let (t, r, b, l) = legend_overflow(spec, plot_estimate, layout.size);
            (t.min(ah / 3), r.min(aw / 3), b.min(ah / 3), l.min(aw / 3))
        }
        None => (0, 0, 0, 0),
    };

    let mut chart = ChartBuilder::on(area)
        .margin_top(CHART_MARGIN_PX + top)
        .margin_right(CHART_MARGIN_PX + right)
        .margin_bottom(CHART_MARGIN_PX + bottom)
        .margin_left(CHART_MARGIN_PX + left)
        .x_label_area_size(X_LABEL_AREA_PX)
        .y_label_area_size(Y_LABEL_AREA_PX)
        .build_cartesian_2d(x_range.clone(), y_range.clone())?;

    let x_span = x_range.end - x_range.start;
    let y_span = y_range.end - y_range.start;
    let x_formatter = |x: &f64| {
        let x = snap_tick(*x, x_span);
        if panel.sci_x_ticks {
            format_sci_label(x)
        } else {
            format_tick_label(x)
        }
    };
    let y_formatter = |y: &f64| format_tick_label(snap_tick(*y, y_span));

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(&panel.x_label)
            .y_desc(&panel.y_label)
            .x_labels(8)
            .y_labels(8)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .label_style((FONT_FAMILY, FONT_SIZE_AXIS_LABEL));
        if panel.grid {
            mesh.light_line_style(GRID_COLOR.mix(0.4))
                .bold_line_style(GRID_COLOR.stroke_width(1));
        } else {
            mesh.disable_mesh();
        }
        mesh.draw()?;
    }

    for s in &panel.series {
        let points = s.finite_points();
        if points.is_empty() {
            continue;
        }
        draw_line(area, &mut chart, &points, s.color, s.stroke_width, s.line_style)?;
        if let Some(spec) = &s.marker {
            draw_markers(&mut chart, &points, s.color, spec)?;
        }
    }

    if let Some((spec, layout)) = legend {
        let plot_area = chart.plotting_area();
        let base = area.get_base_pixel();
        let plot_base = plot_area.get_base_pixel();
        let (ox, oy) = legend_origin(spec, plot_area.dim_in_pixel(), layout.size);
        let origin = clamp_legend_origin(
            (ox + plot_base.0 - base.0, oy + plot_base.1 - base.1),
            layout.size,
            (aw, ah),
        );
        draw_legend(area, &layout, origin, &entries)?;
    }
    Ok(())
}

fn draw_legend_glyph(
    area: &DrawingArea<BitMapBackend, Shift>,
    series: &PlotSeries,
    left: i32,
    center_y: i32,
) -> Result<(), Box<dyn Error>> {
    let color = series.color;
    let has_line = series.line_style != LineStyle::None && series.stroke_width > 0;
    if has_line {
        let stroke = color.stroke_width(LINE_WIDTH_LEGEND);
        let glyph = [
            (left as f64, center_y as f64),
            ((left + LEGEND_GLYPH_PX) as f64, center_y as f64),
        ];
        let pieces = match dash_pattern(series.line_style) {
            Some(pattern) => dash_polyline(&glyph, &pattern),
            None => vec![glyph.to_vec()],
        };
        for piece in pieces {
            let piece: Vec<(i32, i32)> = piece
                .iter()
                .map(|&(x, y)| (x.round() as i32, y.round() as i32))
                .collect();
            area.draw(&PathElement::new(piece, stroke))?;
        }
    }
    if series.marker.is_some() || !has_line {
        let radius = series.marker.map(|m| m.size as i32).unwrap_or(3).clamp(2, 6);
        area.draw(&Circle::new(
            (left + LEGEND_GLYPH_PX / 2, center_y),
            radius,
            color.filled(),
        ))?;
    }
    Ok(())
}

/// Legend box drawn in the panel's pixel space with its top-left corner at `origin`.
fn draw_legend(
    area: &DrawingArea<BitMapBackend, Shift>,
    layout: &LegendLayout,
    origin: (i32, i32),
    entries: &[&PlotSeries],
) -> Result<(), Box<dyn Error>> {
    let (x0, y0) = origin;
    let corner = (x0 + layout.size.0 as i32, y0 + layout.size.1 as i32);
    area.draw(&Rectangle::new([origin, corner], WHITE.mix(0.8).filled()))?;
    area.draw(&Rectangle::new([origin, corner], BLACK.stroke_width(1)))?;

    let font = (FONT_FAMILY, layout.font_px).into_font().color(&BLACK);
    let glyph_left = x0 + LEGEND_PAD_PX;
    let text_left = glyph_left + LEGEND_GLYPH_PX + LEGEND_PAD_PX;
    for (row, s) in entries.iter().enumerate() {
        let row_top = y0 + LEGEND_PAD_PX + row as i32 * layout.row_px;
        draw_legend_glyph(area, s, glyph_left, row_top + layout.row_px / 2)?;
        area.draw(&Text::new(
            s.label.clone(),
            (text_left, row_top + (layout.row_px - layout.font_px) / 2),
            font.clone(),
        ))?;
    }
    Ok(())
}

/// Draws every panel of `figure` onto `root_area`.
/// Returns whether any panel had data to plot.
fn render_figure(
    root_area: &DrawingArea<BitMapBackend, Shift>,
    figure: &Figure,
) -> Result<bool, Box<dyn Error>> {
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        figure.root_name.as_str(),
        (10, 10),
        (FONT_FAMILY, FONT_SIZE_MAIN_TITLE)
            .into_font()
            .color(&BLACK),
    ))?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly((figure.rows, figure.cols));
    let mut any_panel_plotted = false;

    for (panel_index, (area, panel)) in sub_plot_areas.iter().zip(&figure.panels).enumerate() {
        let (px, py) = area.dim_in_pixel();
        let hgap = panel_gap_px(px, figure.wspace);
        let vgap = panel_gap_px(py, figure.hspace);
        let area = area.margin(vgap, vgap, hgap, hgap);

        match panel.ranges() {
            Some((x_range, y_range)) if panel.has_data() => {
                draw_panel(&area, panel, x_range, y_range)?;
                any_panel_plotted = true;
            }
            _ => {
                let reason = if panel.series.is_empty() {
                    "Nothing plotted"
                } else {
                    "No finite data points"
                };
                draw_unavailable_message(&area, panel_index, reason)?;
            }
        }
    }
    Ok(any_panel_plotted)
}

/// Renders a figure to a PNG file.
pub fn draw_figure(figure: &Figure, output_path: &Path) -> Result<(), Box<dyn Error>> {
    let root_area = BitMapBackend::new(output_path, figure.pixel_size()).into_drawing_area();
    let any_panel_plotted = render_figure(&root_area, figure)?;
    root_area.present()?;
    if any_panel_plotted {
        println!("  Plot saved as '{}'.", output_path.display());
    } else {
        println!(
            "  Plot '{}' saved with placeholder messages only: no panel had data.",
            output_path.display()
        );
    }
    Ok(())
}


// src/plot_framework.rs
