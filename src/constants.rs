// src/constants.rs

// Import specific colors needed
use plotters::style::colors::full_palette::{BLUE, GREEN, RED};
use plotters::style::colors::BLACK;
use plotters::style::RGBColor;

// Pixels per inch when turning figure sizes (inches) into bitmap dimensions.
pub const FIGURE_DPI: f64 = 100.0;

// Figure sizes in inches (width, height).
pub const FIGSIZE_SWEEPS: (f64, f64) = (15.0, 9.0);
pub const FIGSIZE_NMRS: (f64, f64) = (15.0, 5.0);
pub const FIGSIZE_FIT_CHECK_SIM: (f64, f64) = (12.0, 9.0);
pub const FIGSIZE_FIT_CHECK_NMR: (f64, f64) = (16.0, 5.0);

// Subplot spacing, as fractions of the average panel size.
pub const WSPACE_SWEEPS: f64 = 0.7;
pub const HSPACE_SWEEPS: f64 = 0.3;
pub const WSPACE_NMRS: f64 = 0.9;
pub const HSPACE_NMRS: f64 = 0.3;
pub const WSPACE_FIT_CHECK_SIM: f64 = 0.4;
pub const HSPACE_FIT_CHECK_SIM: f64 = 0.3;
pub const WSPACE_FIT_CHECK_NMR: f64 = 0.4;
pub const HSPACE_FIT_CHECK_NMR: f64 = 0.2;
// Spacing is applied as a panel margin; the gap is capped so panels never collapse.
pub const MAX_PANEL_GAP_FRACTION: f64 = 0.25;

// Curve defaults.
pub const DEFAULT_MARKER_SIZE: u32 = 4;
pub const DEFAULT_MARKER_EDGE_WIDTH: f64 = 0.5;
pub const DEFAULT_LINE_WIDTH: u32 = 1;
pub const DEFAULT_LEGEND_SIZE: u32 = 10;
pub const NMR_FIT_MARKER_SIZE: u32 = 1;
pub const NMR_FIT_LEGEND_SIZE: u32 = 8;
pub const NMR_RAW_LINE_WIDTH: u32 = 2;

// Fonts.
pub const FONT_FAMILY: &str = "sans-serif";
pub const FONT_SIZE_MAIN_TITLE: i32 = 20;
pub const FONT_SIZE_AXIS_LABEL: i32 = 14;
pub const FONT_SIZE_MESSAGE: i32 = 18;
// Legend font sizes are given in points; bitmap text is scaled up by this factor.
pub const LEGEND_POINT_TO_PX: f64 = 1.4;

// Number of segments used when stroking the dashed/dotted line styles.
pub const DASH_LENGTH_PX: f64 = 8.0;
pub const DOT_LENGTH_PX: f64 = 2.0;
pub const DASH_GAP_PX: f64 = 4.0;

// Gain correction defaults.
pub const DEFAULT_ROLLOFF_CORNER_HZ: f64 = 1.0e6;
pub const DEFAULT_NORM_PARAM: &str = "VLowVpp";

// NMR reading defaults.
pub const DEFAULT_NMR_TSTEP_S: f64 = 2e-7;
pub const NMR_DEVICE_CODE: &str = "NMR";

// Sweep log column names.
pub const LOG_FILENAME_COLUMN: &str = "Filename";
pub const LOG_TEMPERATURE_COLUMN: &str = "Tmm";

// --- Fit Check Color Assignments ---
pub const COLOR_FIT_DATA: &RGBColor = &BLACK;
pub const COLOR_FIT_TOTAL: &RGBColor = &RED;
pub const COLOR_FIT_SHARED: &RGBColor = &BLUE;
pub const COLOR_FIT_BACKGROUND: &RGBColor = &GREEN;
pub const COLOR_NMR_RAW: &RGBColor = &BLUE;
pub const COLOR_NMR_FIT: &RGBColor = &RED;

// Grid line color.
pub const GRID_COLOR: RGBColor = RGBColor(220, 220, 220);

// src/constants.rs
