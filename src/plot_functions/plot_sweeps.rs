// src/plot_functions/plot_sweeps.rs

use std::error::Error;
use std::path::PathBuf;
use tracing::info;

use crate::constants::{FIGSIZE_SWEEPS, HSPACE_SWEEPS, WSPACE_SWEEPS};
use crate::data_input::file_naming::{figure_root_name, make_filename};
use crate::data_input::sweep_data::{load_sweep, ChannelScale, SweepData, SweepLoadOptions};
use crate::error::{RenderError, RenderResult};
use crate::plot_framework::{require_panels, Figure, SeriesHandle};
use crate::plot_functions::plot_sweep::{sweep_all, sweep_multiple};
use crate::plot_functions::PlotStyle;
use crate::plot_mode::SweepLayout;

/// Settings for figures built from several sweep files.
#[derive(Debug, Clone)]
pub struct SweepFigureOptions {
    /// Directory holding the `{device}_{num:03}.dat` files.
    pub data_dir: PathBuf,
    /// Reader settings; the scale is replaced by each file's fold.
    pub load: SweepLoadOptions,
    pub style: PlotStyle,
    pub figsize: (f64, f64),
    pub wspace: f64,
    pub hspace: f64,
}

impl Default for SweepFigureOptions {
    fn default() -> Self {
        SweepFigureOptions {
            data_dir: PathBuf::from("."),
            load: SweepLoadOptions::default(),
            style: PlotStyle::default().outside_legend(),
            figsize: FIGSIZE_SWEEPS,
            wspace: WSPACE_SWEEPS,
            hspace: HSPACE_SWEEPS,
        }
    }
}

/// Pairs each file number with the fold its data is divided by.
///
/// A single fold applies to every file; otherwise the counts must match.
pub fn pair_files_with_folds(filenums: &[u32], folds: &[f64]) -> RenderResult<Vec<(u32, f64)>> {
    let mismatch = || RenderError::FoldCountMismatch {
        filenums: filenums.len(),
        folds: folds.len(),
    };
    let pairs: Vec<(u32, f64)> = match folds {
        [single] => filenums.iter().map(|&n| (n, *single)).collect(),
        _ if folds.len() == filenums.len() => {
            filenums.iter().copied().zip(folds.iter().copied()).collect()
        }
        _ => return Err(mismatch()),
    };
    if pairs.is_empty() {
        return Err(mismatch());
    }
    Ok(pairs)
}

fn load_folded(
    device: &str,
    filenum: u32,
    fold: f64,
    options: &SweepFigureOptions,
) -> Result<SweepData, Box<dyn Error>> {
    let path = options.data_dir.join(make_filename(device, filenum));
    let load = SweepLoadOptions {
        scale: ChannelScale::from_fold(fold)?,
        ..options.load.clone()
    };
    info!("Loading '{}' (fold {})", path.display(), fold);
    load_sweep(&path, &load)
}

/// Every listed sweep in the `fx`/`fy`/`fr`/`xy` layout of a 2x2 figure.
/// Returns the figure and, per file, the four series handles.
pub fn sweeps_all(
    device: &str,
    filenums: &[u32],
    folds: &[f64],
    mode: &str,
    options: &SweepFigureOptions,
) -> Result<(Figure, Vec<[SeriesHandle; 4]>), Box<dyn Error>> {
    let pairs = pair_files_with_folds(filenums, folds)?;
    let mut figure = Figure::new(&figure_root_name(device, filenums), 2, 2, options.figsize)
        .spacing(options.wspace, options.hspace);
    let mut style = options.style.clone();
    let mut lines = Vec::with_capacity(pairs.len());

    for (filenum, fold) in pairs {
        let data = load_folded(device, filenum, fold, options)?;
        lines.push(sweep_all(figure.panels_mut(), &data, mode, &style)?);
        style.index.advance();
    }
    Ok((figure, lines))
}

/// Figure shape for a sweep layout: explicit, else 2x2 for `all`, else one row.
pub fn sweep_figure_shape(layout: &SweepLayout, explicit: Option<(usize, usize)>) -> (usize, usize) {
    match explicit {
        Some(shape) => shape,
        None if layout.is_all() => (2, 2),
        None => (1, layout.modes().len()),
    }
}

/// Every listed sweep plotted once per mode, mode `i` on panel `i`.
pub fn sweeps_multiple<S: AsRef<str>>(
    device: &str,
    filenums: &[u32],
    folds: &[f64],
    modes: &[S],
    layout: Option<(usize, usize)>,
    options: &SweepFigureOptions,
) -> Result<(Figure, Vec<Vec<SeriesHandle>>), Box<dyn Error>> {
    let pairs = pair_files_with_folds(filenums, folds)?;
    let sweep_layout = SweepLayout::parse(modes)?;
    let (rows, cols) = sweep_figure_shape(&sweep_layout, layout);
    let mut figure = Figure::new(&figure_root_name(device, filenums), rows, cols, options.figsize)
        .spacing(options.wspace, options.hspace);
    require_panels(&figure.panels, sweep_layout.modes().len())?;

    let mut style = options.style.clone();
    let mut lines = Vec::with_capacity(pairs.len());
    for (filenum, fold) in pairs {
        let data = load_folded(device, filenum, fold, options)?;
        let handles = if sweep_layout.is_all() {
            sweep_all(figure.panels_mut(), &data, modes[0].as_ref(), &style)?.to_vec()
        } else {
            sweep_multiple(figure.panels_mut(), &data, modes, &style)?
        };
        lines.push(handles);
        style.index.advance();
    }
    Ok((figure, lines))
}


// src/plot_functions/plot_sweeps.rs
