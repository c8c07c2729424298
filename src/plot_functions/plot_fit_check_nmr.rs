// src/plot_functions/plot_fit_check_nmr.rs

use std::error::Error;
use std::path::Path;
use tracing::info;

use crate::axis_names::{LABEL_FFT_IMAG, LABEL_FFT_REAL, LABEL_FID, LABEL_FREQUENCY, LABEL_TIME};
use crate::constants::{
    COLOR_NMR_FIT, COLOR_NMR_RAW, DEFAULT_NMR_TSTEP_S, FIGSIZE_FIT_CHECK_NMR,
    HSPACE_FIT_CHECK_NMR, NMR_FIT_LEGEND_SIZE, NMR_FIT_MARKER_SIZE, NMR_RAW_LINE_WIDTH,
    WSPACE_FIT_CHECK_NMR,
};
use crate::data_analysis::fid_model::{fid_zero_filled, fid_zero_filled_fft, PARAMS_PER_PEAK};
use crate::data_input::file_naming::file_stem_label;
use crate::data_input::fit_params::load_nmr_fit_params;
use crate::data_input::nmr_data::{load_nmr, NmrData};
use crate::error::RenderResult;
use crate::plot_framework::{
    require_panels, Figure, LegendSpec, MarkerSpec, Panel, PlotSeries, SeriesHandle,
};
use crate::plot_functions::PlotStyle;
use crate::style_cycle::{FillStyle, LineStyle, MarkerShape};

fn point_marker(size: u32) -> Option<MarkerSpec> {
    Some(MarkerSpec {
        shape: MarkerShape::Point,
        size,
        fill: FillStyle::Full,
        edge_width: 0.0,
    })
}

fn raw_trace<'a>(
    x: impl IntoIterator<Item = &'a f64>,
    y: impl IntoIterator<Item = &'a f64>,
    line_width: u32,
) -> PlotSeries {
    PlotSeries::from_xy(x, y)
        .color(*COLOR_NMR_RAW)
        .line(LineStyle::Solid, line_width)
        .marker(point_marker(NMR_FIT_MARKER_SIZE))
}

fn fit_trace<'a>(
    x: impl IntoIterator<Item = &'a f64>,
    y: impl IntoIterator<Item = &'a f64>,
    style: &PlotStyle,
    connected: bool,
) -> PlotSeries {
    let (line_style, width) = if connected {
        (LineStyle::Solid, style.line_width)
    } else {
        (LineStyle::None, 0)
    };
    PlotSeries::from_xy(x, y)
        .color(*COLOR_NMR_FIT)
        .line(line_style, width)
        .marker(point_marker(style.marker_size))
}

/// Raw FID and spectrum against the fitted model on three panels.
///
/// Returns `[raw, fit]` handles for the FID, the real part and the imaginary part.
/// The style's line and marker settings apply to the fitted curves only.
pub fn fit_check_nmr(
    panels: &mut [Panel],
    data: &NmrData,
    popt: &[f64],
    style: &PlotStyle,
) -> RenderResult<[[SeriesHandle; 2]; 3]> {
    require_panels(panels, 3)?;
    let fit_fid = fid_zero_filled(&data.t, popt, data.zerofill_num)?;
    let fit_fft = fid_zero_filled_fft(&data.t, popt, data.zerofill_num)?;
    let fit_real = fit_fft.mapv(|c| c.re);
    let fit_imag = fit_fft.mapv(|c| c.im);

    let fid_panel = &mut panels[0];
    let fid_handles = [
        fid_panel.add_series(
            raw_trace(&data.t0fill, &data.nmr0fill, 1).label(data.filename.clone()),
        ),
        fid_panel.add_series(fit_trace(&data.t0fill, &fit_fid, style, false)),
    ];
    fid_panel.set_labels(LABEL_TIME, LABEL_FID);
    fid_panel.sci_x_ticks = true;
    fid_panel.legend = style.legend;

    let real_panel = &mut panels[1];
    let real_handles = [
        real_panel.add_series(raw_trace(&data.f0fill, &data.fft_real(), NMR_RAW_LINE_WIDTH)),
        real_panel.add_series(fit_trace(&data.f0fill, &fit_real, style, true)),
    ];
    real_panel.set_labels(LABEL_FREQUENCY, LABEL_FFT_REAL);
    real_panel.sci_x_ticks = true;

    let imag_panel = &mut panels[2];
    let imag_handles = [
        imag_panel.add_series(raw_trace(&data.f0fill, &data.fft_imag(), NMR_RAW_LINE_WIDTH)),
        imag_panel.add_series(fit_trace(&data.f0fill, &fit_imag, style, true)),
    ];
    imag_panel.set_labels(LABEL_FREQUENCY, LABEL_FFT_IMAG);
    imag_panel.sci_x_ticks = true;

    Ok([fid_handles, real_handles, imag_handles])
}

#[derive(Debug, Clone)]
pub struct FitCheckNmrOptions {
    pub tstep: f64,
    pub style: PlotStyle,
    pub figsize: (f64, f64),
    pub wspace: f64,
    pub hspace: f64,
}

impl Default for FitCheckNmrOptions {
    fn default() -> Self {
        FitCheckNmrOptions {
            tstep: DEFAULT_NMR_TSTEP_S,
            style: PlotStyle {
                marker_size: NMR_FIT_MARKER_SIZE,
                legend: Some(LegendSpec {
                    font_size: NMR_FIT_LEGEND_SIZE,
                    ..LegendSpec::default()
                }),
                ..PlotStyle::default()
            },
            figsize: FIGSIZE_FIT_CHECK_NMR,
            wspace: WSPACE_FIT_CHECK_NMR,
            hspace: HSPACE_FIT_CHECK_NMR,
        }
    }
}

/// Loads an NMR file with the zero-fill recorded next to its saved fit and builds the
/// 1x3 fit-check figure.
pub fn fit_check_nmr_file(
    filenmr: &Path,
    filepopt: &Path,
    options: &FitCheckNmrOptions,
) -> Result<(Figure, [[SeriesHandle; 2]; 3]), Box<dyn Error>> {
    let key = filenmr
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let record = load_nmr_fit_params(filepopt, &key)?;
    info!(
        "NMR fit check of '{}': {} peaks, zero-fill {}",
        key,
        record.popt.len() / PARAMS_PER_PEAK,
        record.zerofill_num
    );
    let data = load_nmr(filenmr, options.tstep, record.zerofill_num)?;

    let mut figure = Figure::new(&file_stem_label(&data.filename), 1, 3, options.figsize)
        .spacing(options.wspace, options.hspace);
    let handles = fit_check_nmr(figure.panels_mut(), &data, &record.popt, &options.style)?;
    Ok((figure, handles))
}


// src/plot_functions/plot_fit_check_nmr.rs
