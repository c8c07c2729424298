// src/plot_functions/plot_fit_check_sim.rs

use ndarray::Array1;
use ndarray_stats::QuantileExt;
use std::error::Error;
use std::path::Path;
use tracing::{debug, info};

use crate::axis_names::{
    LABEL_FREQUENCY, LABEL_RESIDUAL, LABEL_R_CHANNEL, LABEL_X_CHANNEL, LABEL_Y_CHANNEL,
};
use crate::constants::{
    COLOR_FIT_BACKGROUND, COLOR_FIT_DATA, COLOR_FIT_SHARED, COLOR_FIT_TOTAL, FIGSIZE_FIT_CHECK_SIM,
    HSPACE_FIT_CHECK_SIM, WSPACE_FIT_CHECK_SIM,
};
use crate::data_analysis::decomposition::{decompose, Decomposition};
use crate::data_analysis::fit_model::{BasisFunction, Model, SharedModel};
use crate::data_analysis::frequency_window::{select, FrequencyWindow};
use crate::data_input::file_naming::file_stem_label;
use crate::data_input::fit_params::load_sweep_fit_params;
use crate::data_input::sweep_data::{load_sweep, SweepData, SweepLoadOptions};
use crate::error::{RenderError, RenderResult};
use crate::plot_framework::{require_panels, Figure, Panel, SeriesHandle};
use crate::plot_functions::PlotStyle;
use crate::plot_mode::{ChannelVariant, SweepAxis, SweepChannel};
use crate::style_cycle::LineStyle;

pub const LEGEND_DATA_POINTS: &str = "Data points";
pub const LEGEND_FIT_TOTAL: &str = "Fit total";
pub const LEGEND_SHARED: &str = "Shared component";
pub const LEGEND_BACKGROUND: &str = "Background";
pub const LEGEND_ZERO_GUIDELINE: &str = "Zero guideline";
pub const LEGEND_RESIDUAL: &str = "Residual";

/// Series handles of a fit-check figure, laid out like its 2x2 panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitCheckHandles {
    /// Data, total, shared component, background.
    pub x: [SeriesHandle; 4],
    pub y: [SeriesHandle; 4],
    /// Data, total magnitude.
    pub r: [SeriesHandle; 2],
    /// Zero guideline, residual.
    pub residual: [SeriesHandle; 2],
}

impl FitCheckHandles {
    /// Handle counts per panel, row by row.
    pub fn shape(&self) -> [[usize; 2]; 2] {
        [
            [self.x.len(), self.y.len()],
            [self.r.len(), self.residual.len()],
        ]
    }
}

/// Everything a fit check draws, given the data and the per-channel fit results.
#[derive(Debug, Clone, Copy)]
pub struct FitCheckInput<'a> {
    pub fitmode: &'a str,
    pub funcs1: &'a [BasisFunction],
    pub funcs2: &'a [BasisFunction],
    pub sharenum: usize,
    pub popt1: &'a [f64],
    pub popt2: &'a [f64],
    /// Residual of the shared fit, X then Y, on the windowed frequencies.
    pub res: &'a Array1<f64>,
    pub frange: FrequencyWindow,
}

fn channel_pair(data: &SweepData, fitmode: &str) -> RenderResult<[Array1<f64>; 3]> {
    let variant = ChannelVariant::from_fitmode(fitmode);
    Ok([
        data.channel(SweepChannel::new(SweepAxis::X, variant))?,
        data.channel(SweepChannel::new(SweepAxis::Y, variant))?,
        data.channel(SweepChannel::new(SweepAxis::R, variant))?,
    ])
}

fn draw_component_panel(
    panel: &mut Panel,
    data: &SweepData,
    channel: &Array1<f64>,
    x: &Array1<f64>,
    parts: &Decomposition,
    style: &PlotStyle,
    labelled: bool,
) -> [SeriesHandle; 4] {
    let label = |text: &str| if labelled { text.to_string() } else { String::new() };
    let handles = [
        panel.add_series(
            style
                .dots(&data.f, channel, *COLOR_FIT_DATA, style.marker_size)
                .label(label(LEGEND_DATA_POINTS)),
        ),
        panel.add_series(
            style
                .plain_line(x, &parts.total, *COLOR_FIT_TOTAL, LineStyle::Solid)
                .label(label(LEGEND_FIT_TOTAL)),
        ),
        panel.add_series(
            style
                .plain_line(x, &parts.main, *COLOR_FIT_SHARED, LineStyle::DashDot)
                .label(label(LEGEND_SHARED)),
        ),
        panel.add_series(
            style
                .plain_line(x, &parts.background, *COLOR_FIT_BACKGROUND, LineStyle::Dashed)
                .label(label(LEGEND_BACKGROUND)),
        ),
    ];
    panel.grid = true;
    handles
}

/// Overlays a shared X/Y fit on the sweep data.
///
/// Panels (row-major 2x2): X with total, shared component and background; the same for
/// Y; R with the magnitude of the fitted X/Y; residuals against a zero guideline.
/// Fitted curves cover the frequency window only; data points cover the full sweep.
pub fn fit_check_sim(
    panels: &mut [Panel],
    data: &SweepData,
    input: &FitCheckInput<'_>,
    style: &PlotStyle,
) -> RenderResult<FitCheckHandles> {
    require_panels(panels, 4)?;
    let [y1, y2, y3] = channel_pair(data, input.fitmode)?;
    let x = select(&data.f, &input.frange.mask(&data.f));
    if input.res.len() != 2 * x.len() {
        return Err(RenderError::ParamCount {
            what: "residual",
            expected: 2 * x.len(),
            got: input.res.len(),
        });
    }

    let parts1 = decompose(input.funcs1, input.sharenum, input.popt1, &x)?;
    let parts2 = decompose(input.funcs2, input.sharenum, input.popt2, &x)?;
    debug!(
        "Main component uses {} and {} basis functions",
        parts1.main_terms, parts2.main_terms
    );

    let handles_x =
        draw_component_panel(&mut panels[0], data, &y1, &x, &parts1, style, style.legend.is_some());
    panels[0].set_labels(LABEL_FREQUENCY, LABEL_X_CHANNEL);
    panels[0].legend = style.legend;

    let handles_y = draw_component_panel(&mut panels[1], data, &y2, &x, &parts2, style, false);
    panels[1].set_labels(LABEL_FREQUENCY, LABEL_Y_CHANNEL);

    let total_r: Array1<f64> = parts1
        .total
        .iter()
        .zip(parts2.total.iter())
        .map(|(a, b)| a.hypot(*b))
        .collect();
    let panel_r = &mut panels[2];
    let handles_r = [
        panel_r.add_series(style.dots(&data.f, &y3, *COLOR_FIT_DATA, style.marker_size)),
        panel_r.add_series(style.plain_line(&x, &total_r, *COLOR_FIT_TOTAL, LineStyle::Solid)),
    ];
    panel_r.set_labels(LABEL_FREQUENCY, LABEL_R_CHANNEL);
    panel_r.grid = true;

    let guide_x = match (x.min(), x.max()) {
        (Ok(lo), Ok(hi)) => vec![*lo, *hi],
        _ => Vec::new(),
    };
    let guide_y = vec![0.0; guide_x.len()];
    let doubled_x: Vec<f64> = x.iter().chain(x.iter()).copied().collect();
    let panel_res = &mut panels[3];
    let handles_res = [
        panel_res.add_series(
            style
                .plain_line(&guide_x, &guide_y, *COLOR_FIT_DATA, LineStyle::Solid)
                .label(LEGEND_ZERO_GUIDELINE),
        ),
        panel_res.add_series(
            style
                .dots(&doubled_x, input.res, *COLOR_FIT_TOTAL, style.marker_size)
                .label(LEGEND_RESIDUAL),
        ),
    ];
    panel_res.set_labels(LABEL_FREQUENCY, LABEL_RESIDUAL);
    panel_res.grid = true;

    Ok(FitCheckHandles {
        x: handles_x,
        y: handles_y,
        r: handles_r,
        residual: handles_res,
    })
}

#[derive(Debug, Clone)]
pub struct FitCheckSimOptions {
    pub load: SweepLoadOptions,
    pub frange: FrequencyWindow,
    pub style: PlotStyle,
    pub figsize: (f64, f64),
    pub wspace: f64,
    pub hspace: f64,
}

impl Default for FitCheckSimOptions {
    fn default() -> Self {
        FitCheckSimOptions {
            load: SweepLoadOptions::default(),
            frange: FrequencyWindow::default(),
            style: PlotStyle::default(),
            figsize: FIGSIZE_FIT_CHECK_SIM,
            wspace: WSPACE_FIT_CHECK_SIM,
            hspace: HSPACE_FIT_CHECK_SIM,
        }
    }
}

/// Residual of the shared model against the windowed X and Y data, plus the
/// per-channel parameter vectors.
pub fn shared_fit_residual(
    data: &SweepData,
    fitmode: &str,
    funcs1: &[BasisFunction],
    funcs2: &[BasisFunction],
    sharenum: usize,
    popt: &[f64],
    frange: FrequencyWindow,
) -> RenderResult<(Array1<f64>, Vec<f64>, Vec<f64>)> {
    let [y1, y2, _] = channel_pair(data, fitmode)?;
    let mask = frange.mask(&data.f);
    let x = select(&data.f, &mask);
    let measured: Array1<f64> = select(&y1, &mask)
        .iter()
        .chain(select(&y2, &mask).iter())
        .copied()
        .collect();

    let model1 = Model::unit(funcs1);
    let model2 = Model::unit(funcs2);
    let shared = SharedModel::new(&model1, &model2, sharenum)?;
    let res = shared.eval(&x, popt)? - &measured;
    let unfolded = shared.unfold(popt)?;
    Ok((res, unfolded.first, unfolded.second))
}

/// Loads a sweep and its saved shared-fit parameters and builds the 2x2 fit-check figure.
pub fn fit_check_sim_file(
    filename: &Path,
    filepopt: &Path,
    fitmode: &str,
    funcs1: &[BasisFunction],
    funcs2: &[BasisFunction],
    sharenum: usize,
    options: &FitCheckSimOptions,
) -> Result<(Figure, FitCheckHandles), Box<dyn Error>> {
    let data = load_sweep(filename, &options.load)?;
    let popt = load_sweep_fit_params(filepopt, &data.filename)?;
    info!(
        "Fit check of '{}' with {} parameters ({} shared)",
        data.filename,
        popt.len(),
        sharenum
    );
    let (res, popt1, popt2) = shared_fit_residual(
        &data,
        fitmode,
        funcs1,
        funcs2,
        sharenum,
        &popt,
        options.frange,
    )?;

    let mut figure = Figure::new(&file_stem_label(&data.filename), 2, 2, options.figsize)
        .spacing(options.wspace, options.hspace);
    let input = FitCheckInput {
        fitmode,
        funcs1,
        funcs2,
        sharenum,
        popt1: &popt1,
        popt2: &popt2,
        res: &res,
        frange: options.frange,
    };
    let handles = fit_check_sim(figure.panels_mut(), &data, &input, &options.style)?;
    Ok((figure, handles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_analysis::gain_correction::{FirstOrderRolloff, Uncorrected};
    use ndarray::array;
    use BasisFunction::*;

    fn sample() -> SweepData {
        SweepData::new(
            "h1m_010.dat",
            array![1.0, 2.0, 3.0, 4.0],
            array![1.5, 2.5, 3.5, 4.5],
            array![0.0, 1.0, 2.0, 3.0],
            None,
            &Uncorrected,
        )
        .unwrap()
    }

    #[test]
    fn test_residual_and_unfold() {
        // X = c + c1*f, Y = c + c1'*f with the constant shared.
        let (res, popt1, popt2) = shared_fit_residual(
            &sample(),
            "xy",
            &[Constant, Linear],
            &[Constant, Linear],
            1,
            &[0.5, 0.0, 1.0, -1.5, 1.0],
            FrequencyWindow::new(Some(2.0), Some(3.0)).unwrap(),
        )
        .unwrap();
        assert_eq!(popt1, vec![0.5, 0.0, 1.0]);
        assert_eq!(popt2, vec![0.5, -1.5, 1.0]);
        // X fit: 0.5 + f, Y fit: f - 1 on f = 2, 3
        assert_eq!(res.len(), 4);
        assert!(res.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_residual_rejects_wrong_param_count() {
        let err = shared_fit_residual(
            &sample(),
            "xy",
            &[Constant],
            &[Constant],
            1,
            &[0.5, 1.0],
            FrequencyWindow::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::ParamCount { .. }));
    }

    #[test]
    fn test_fit_check_decomposition_panels() {
        let data = sample();
        let frange = FrequencyWindow::new(Some(2.0), None).unwrap();
        let res = array![0.1, 0.2, 0.3, -0.1, -0.2, -0.3];
        let input = FitCheckInput {
            fitmode: "xy",
            funcs1: &[Constant, Linear],
            funcs2: &[Constant, Linear],
            sharenum: 1,
            popt1: &[0.5, 0.0, 1.0],
            popt2: &[0.5, -1.0, 1.0],
            res: &res,
            frange,
        };
        let mut panels = vec![Panel::new(); 4];
        let handles = fit_check_sim(&mut panels, &data, &input, &PlotStyle::default()).unwrap();
        assert_eq!(handles.shape(), [[4, 4], [2, 2]]);

        // Data points span the full sweep, fitted curves only the window.
        let x_panel = &panels[0];
        assert_eq!(x_panel.series[handles.x[0]].data.len(), 4);
        assert_eq!(x_panel.series[handles.x[1]].data, vec![(2.0, 2.5), (3.0, 3.5), (4.0, 4.5)]);
        assert_eq!(x_panel.series[handles.x[2]].data[0], (2.0, 0.5));
        assert_eq!(x_panel.series[handles.x[3]].data[0], (2.0, 2.0));
        assert_eq!(x_panel.series[handles.x[2]].line_style, LineStyle::DashDot);
        assert_eq!(x_panel.series[handles.x[3]].line_style, LineStyle::Dashed);
        assert_eq!(x_panel.series[handles.x[1]].label, LEGEND_FIT_TOTAL);
        assert!(x_panel.legend.is_some());
        assert!(panels[1].legend.is_none());
        assert!(panels[1].series.iter().all(|s| s.label.is_empty()));

        let r_fit = &panels[2].series[handles.r[1]].data;
        assert!((r_fit[0].1 - 2.5f64.hypot(1.5)).abs() < 1e-12);

        let guide = &panels[3].series[handles.residual[0]];
        assert_eq!(guide.data, vec![(2.0, 0.0), (4.0, 0.0)]);
        assert_eq!(guide.label, LEGEND_ZERO_GUIDELINE);
        let residual = &panels[3].series[handles.residual[1]];
        assert_eq!(residual.data.len(), 6);
        assert_eq!(residual.data[3], (2.0, -0.1));
        assert!(panels.iter().all(|p| p.grid));
    }

    #[test]
    fn test_fit_check_unreachable_sharenum() {
        let res = Array1::zeros(8);
        let input = FitCheckInput {
            fitmode: "x",
            funcs1: &[Constant],
            funcs2: &[Constant],
            sharenum: 3,
            popt1: &[0.5],
            popt2: &[0.5],
            res: &res,
            frange: FrequencyWindow::default(),
        };
        let mut panels = vec![Panel::new(); 4];
        assert!(matches!(
            fit_check_sim(&mut panels, &sample(), &input, &PlotStyle::default()),
            Err(RenderError::SharedCountUnreachable { .. })
        ));
    }

    /// Raw Y is zero; with a 1 Hz corner the corrected channels are gx = 1, gy = f.
    fn rolled_off() -> SweepData {
        SweepData::new(
            "h1m_011.dat",
            array![1.0, 2.0, 3.0],
            array![1.0, 1.0, 1.0],
            array![0.0, 0.0, 0.0],
            None,
            &FirstOrderRolloff { corner_hz: 1.0 },
        )
        .unwrap()
    }

    #[test]
    fn test_gain_corrected_fitmode_uses_corrected_channels() {
        // X = 1 + 0 f, Y = 0 + 1 f with nothing shared
        let popt = [1.0, 0.0, 0.0, 1.0];
        let residual = |fitmode: &str| {
            shared_fit_residual(
                &rolled_off(),
                fitmode,
                &[Linear],
                &[Linear],
                0,
                &popt,
                FrequencyWindow::default(),
            )
            .unwrap()
            .0
        };
        assert!(residual("gxy").iter().all(|v| v.abs() < 1e-12));
        // Raw channels: Y residual is the model itself
        assert_eq!(residual("xy").slice(ndarray::s![3..]).to_vec(), vec![1.0, 2.0, 3.0]);
        // Only a lowercase g selects the corrected channels
        assert_eq!(residual("Gxy"), residual("xy"));
    }

    #[test]
    fn test_fit_check_gain_corrected_data_points() {
        let res = Array1::zeros(6);
        let input = FitCheckInput {
            fitmode: "gxy",
            funcs1: &[Linear],
            funcs2: &[Linear],
            sharenum: 0,
            popt1: &[1.0, 0.0],
            popt2: &[0.0, 1.0],
            res: &res,
            frange: FrequencyWindow::default(),
        };
        let mut panels = vec![Panel::new(); 4];
        let handles =
            fit_check_sim(&mut panels, &rolled_off(), &input, &PlotStyle::default()).unwrap();
        let y_data = &panels[1].series[handles.y[0]].data;
        assert_eq!(y_data, &vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let r_data = &panels[2].series[handles.r[0]].data;
        assert!((r_data[2].1 - 10.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_fit_check_rejects_short_residual() {
        let res = array![0.1];
        let input = FitCheckInput {
            fitmode: "xy",
            funcs1: &[Constant],
            funcs2: &[Constant],
            sharenum: 1,
            popt1: &[0.5],
            popt2: &[0.5],
            res: &res,
            frange: FrequencyWindow::default(),
        };
        let mut panels = vec![Panel::new(); 4];
        assert_eq!(
            fit_check_sim(&mut panels, &sample(), &input, &PlotStyle::default()),
            Err(RenderError::ParamCount {
                what: "residual",
                expected: 8,
                got: 1,
            })
        );
    }

    #[test]
    fn test_fit_check_sim_file() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("h1m_010.dat");
        std::fs::write(&data_path, "f,x,y\n1,1.5,0\n2,2.5,1\n3,3.5,2\n").unwrap();
        let popt_path = dir.path().join("popt.csv");
        std::fs::write(&popt_path, "Filename,c,c0,c1,c0,c1\nh1m_010,0.5,0,1,-1.5,1\n").unwrap();
        let options = FitCheckSimOptions {
            load: SweepLoadOptions {
                correction: std::rc::Rc::new(Uncorrected),
                ..SweepLoadOptions::default()
            },
            ..FitCheckSimOptions::default()
        };
        let (figure, handles) = fit_check_sim_file(
            &data_path,
            &popt_path,
            "xy",
            &[Constant, Linear],
            &[Constant, Linear],
            1,
            &options,
        )
        .unwrap();
        assert_eq!(figure.root_name, "h1m_010");
        assert_eq!(handles.shape(), [[4, 4], [2, 2]]);
        let residual = &figure.panel(1, 1).series[handles.residual[1]];
        assert!(residual.data.iter().all(|(_, r)| r.abs() < 1e-12));
    }
}

// src/plot_functions/plot_fit_check_sim.rs
