// src/plot_functions/plot_nmr.rs

use std::error::Error;
use std::path::PathBuf;
use tracing::info;

use crate::axis_names::nmr_axis_label;
use crate::constants::{
    DEFAULT_NMR_TSTEP_S, FIGSIZE_NMRS, HSPACE_NMRS, NMR_DEVICE_CODE, WSPACE_NMRS,
};
use crate::data_input::file_naming::{figure_root_name, make_filename};
use crate::data_input::nmr_data::{load_nmr, NmrData};
use crate::error::RenderResult;
use crate::plot_framework::{require_panels, Figure, Panel, SeriesHandle};
use crate::plot_functions::PlotStyle;
use crate::plot_mode::{nmr_all_trio, NmrLayout, NmrPlotMode};

fn add_nmr_curve(
    panel: &mut Panel,
    data: &NmrData,
    mode: &NmrPlotMode,
    style: &PlotStyle,
) -> SeriesHandle {
    let x_values = data.channel(mode.x_axis);
    let y_values = data.channel(mode.y_axis);
    let handle = panel.add_series(style.cycled_series(&x_values, &y_values, data.legend_label()));
    panel.set_labels(nmr_axis_label(mode.x_axis), nmr_axis_label(mode.y_axis));
    if let Some(legend) = style.legend {
        panel.legend = Some(legend);
    }
    panel.grid = true;
    handle
}

/// Plots one NMR trace on one panel, e.g. `"td"` for the FID or `"fm"` for the spectrum magnitude.
pub fn nmr_single(
    panel: &mut Panel,
    data: &NmrData,
    mode: &str,
    style: &PlotStyle,
) -> RenderResult<SeriesHandle> {
    let mode = NmrPlotMode::parse(mode)?;
    Ok(add_nmr_curve(panel, data, &mode, style))
}

/// FID, spectrum real part and spectrum imaginary part on three panels.
pub fn nmr_all(
    panels: &mut [Panel],
    data: &NmrData,
    style: &PlotStyle,
) -> RenderResult<[SeriesHandle; 3]> {
    require_panels(panels, 3)?;
    let quiet = style.without_legend();
    let mut handles = [0; 3];
    for (i, mode) in nmr_all_trio().iter().enumerate() {
        let panel_style = if i == 0 { style } else { &quiet };
        handles[i] = add_nmr_curve(&mut panels[i], data, mode, panel_style);
    }
    Ok(handles)
}

#[derive(Debug, Clone)]
pub struct NmrFigureOptions {
    /// Directory holding the `NMR_{num:03}.dat` files.
    pub data_dir: PathBuf,
    pub tstep: f64,
    pub zerofill_num: usize,
    pub style: PlotStyle,
    pub figsize: (f64, f64),
    pub wspace: f64,
    pub hspace: f64,
}

impl Default for NmrFigureOptions {
    fn default() -> Self {
        NmrFigureOptions {
            data_dir: PathBuf::from("."),
            tstep: DEFAULT_NMR_TSTEP_S,
            zerofill_num: 0,
            style: PlotStyle::default().outside_legend(),
            figsize: FIGSIZE_NMRS,
            wspace: WSPACE_NMRS,
            hspace: HSPACE_NMRS,
        }
    }
}

/// Plots several NMR files into one figure: 1x3 for `all`, otherwise a single panel.
pub fn nmrs_all(
    filenums: &[u32],
    mode: &str,
    options: &NmrFigureOptions,
) -> Result<(Figure, Vec<Vec<SeriesHandle>>), Box<dyn Error>> {
    let layout = NmrLayout::parse(mode)?;
    let root_name = figure_root_name(NMR_DEVICE_CODE, filenums);
    let mut figure = match layout {
        NmrLayout::All => Figure::new(&root_name, 1, 3, options.figsize)
            .spacing(options.wspace, options.hspace),
        NmrLayout::Single(_) => Figure::new(&root_name, 1, 1, options.figsize),
    };

    let mut style = options.style.clone();
    let mut lines = Vec::with_capacity(filenums.len());
    for &filenum in filenums {
        let path = options.data_dir.join(make_filename(NMR_DEVICE_CODE, filenum));
        info!("Loading '{}'", path.display());
        let data = load_nmr(&path, options.tstep, options.zerofill_num)?;
        let handles = match &layout {
            NmrLayout::All => nmr_all(figure.panels_mut(), &data, &style)?.to_vec(),
            NmrLayout::Single(single) => {
                vec![add_nmr_curve(figure.panel_mut(0, 0), &data, single, &style)]
            }
        };
        lines.push(handles);
        style.index.advance();
    }
    Ok((figure, lines))
}


// src/plot_functions/plot_nmr.rs
