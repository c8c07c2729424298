// src/main.rs

use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;

use sweep_nmr_render::constants::{DEFAULT_NMR_TSTEP_S, DEFAULT_NORM_PARAM};
use sweep_nmr_render::data_analysis::fit_model::BasisFunction;
use sweep_nmr_render::data_analysis::frequency_window::FrequencyWindow;
use sweep_nmr_render::data_analysis::gain_correction::{
    FirstOrderRolloff, GainCorrection, Uncorrected,
};
use sweep_nmr_render::data_input::sweep_data::SweepLoadOptions;
use sweep_nmr_render::plot_framework::{draw_figure, Figure, LegendLocation};
use sweep_nmr_render::plot_functions::plot_fit_check_nmr::{fit_check_nmr_file, FitCheckNmrOptions};
use sweep_nmr_render::plot_functions::plot_fit_check_sim::{fit_check_sim_file, FitCheckSimOptions};
use sweep_nmr_render::plot_functions::plot_nmr::{nmrs_all, NmrFigureOptions};
use sweep_nmr_render::plot_functions::plot_sweeps::{sweeps_multiple, SweepFigureOptions};
use sweep_nmr_render::plot_functions::PlotStyle;

#[derive(Parser)]
#[command(name = "sweep_nmr_render", version)]
#[command(about = "Render lock-in sweeps, NMR signals and fit checks to PNG", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct CommonArgs {
    /// Output PNG path (defaults to the figure name with a .png suffix)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
    /// Legend font size in points
    #[arg(long, global = true)]
    legend_size: Option<u32>,
    /// Marker size in pixels
    #[arg(long, global = true)]
    marker_size: Option<u32>,
    /// Line width in pixels
    #[arg(long, global = true)]
    line_width: Option<u32>,
    /// Legend corner placed at the anchor, e.g. "lower left"
    #[arg(long, global = true)]
    legend_loc: Option<LegendLocation>,
    /// Hide the legend
    #[arg(long, global = true)]
    no_legend: bool,
}

impl CommonArgs {
    fn apply(&self, style: &mut PlotStyle) {
        if let Some(size) = self.marker_size {
            style.marker_size = size;
        }
        if let Some(width) = self.line_width {
            style.line_width = width;
        }
        if self.no_legend {
            style.legend = None;
        } else if let Some(legend) = style.legend.as_mut() {
            if let Some(size) = self.legend_size {
                legend.font_size = size;
            }
            if let Some(location) = self.legend_loc {
                legend.location = location;
            }
        }
    }
}

#[derive(Args)]
struct SweepReadArgs {
    /// Sweep log with temperature and normalization columns
    #[arg(long)]
    log: Option<PathBuf>,
    /// Log column used to normalize `n` channels
    #[arg(long, default_value = DEFAULT_NORM_PARAM)]
    norm_param: String,
    /// Corner frequency of the first-order roll-off correction
    #[arg(long)]
    corner_hz: Option<f64>,
    /// Use the raw channels for the `g` variants
    #[arg(long, conflicts_with = "corner_hz")]
    no_gain_correction: bool,
}

impl SweepReadArgs {
    fn load_options(&self) -> SweepLoadOptions {
        let correction: Rc<dyn GainCorrection> = match (self.no_gain_correction, self.corner_hz) {
            (true, _) => Rc::new(Uncorrected),
            (false, Some(corner_hz)) => Rc::new(FirstOrderRolloff { corner_hz }),
            (false, None) => Rc::new(FirstOrderRolloff::default()),
        };
        SweepLoadOptions {
            log_path: self.log.clone(),
            norm_param: self.norm_param.clone(),
            correction,
            ..SweepLoadOptions::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Plot several sweeps of one device into one figure
    Sweeps {
        /// Device code, e.g. h1m
        device: String,
        /// File numbers
        #[arg(required = true)]
        filenums: Vec<u32>,
        /// One fold for every file, or one fold per file
        #[arg(long, value_delimiter = ',', default_value = "1")]
        folds: Vec<f64>,
        /// Plot modes, e.g. `all`, `gall` or `fx,fy,xy`
        #[arg(long, value_delimiter = ',', default_value = "all")]
        mode: Vec<String>,
        /// Panel grid as ROWSxCOLS
        #[arg(long, value_parser = parse_layout)]
        layout: Option<(usize, usize)>,
        /// Directory holding the data files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        #[command(flatten)]
        read: SweepReadArgs,
    },
    /// Plot several NMR signals into one figure
    Nmrs {
        /// File numbers of NMR_xxx.dat files
        #[arg(required = true)]
        filenums: Vec<u32>,
        /// `all` or a two-character mode such as `td` or `fm`
        #[arg(long, default_value = "all")]
        mode: String,
        /// Sample spacing in seconds
        #[arg(long, default_value_t = DEFAULT_NMR_TSTEP_S)]
        tstep: f64,
        /// Number of zeros appended before the transform
        #[arg(long, default_value_t = 0)]
        zerofill: usize,
        /// Directory holding the data files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
    },
    /// Check a shared X/Y sweep fit against its data
    FitSim {
        /// Sweep data file
        file: PathBuf,
        /// Saved fit parameters
        popt: PathBuf,
        /// Fit mode; a `g` selects the gain-corrected channels
        #[arg(long, default_value = "xy")]
        fitmode: String,
        /// Basis functions of the X-channel model
        #[arg(long, value_delimiter = ',', required = true)]
        funcs1: Vec<BasisFunction>,
        /// Basis functions of the Y-channel model
        #[arg(long, value_delimiter = ',', required = true)]
        funcs2: Vec<BasisFunction>,
        /// Number of leading parameters shared by both models
        #[arg(long)]
        sharenum: usize,
        /// Lower edge of the fitted frequency window
        #[arg(long)]
        fmin: Option<f64>,
        /// Upper edge of the fitted frequency window
        #[arg(long)]
        fmax: Option<f64>,
        #[command(flatten)]
        read: SweepReadArgs,
    },
    /// Check an NMR fit against its FID and spectrum
    FitNmr {
        /// NMR data file
        file: PathBuf,
        /// Saved fit parameters with the zero-fill count
        popt: PathBuf,
        /// Sample spacing in seconds
        #[arg(long, default_value_t = DEFAULT_NMR_TSTEP_S)]
        tstep: f64,
    },
}

fn parse_layout(s: &str) -> Result<(usize, usize), String> {
    let (rows, cols) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected ROWSxCOLS, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| format!("invalid panel count '{v}'"))
    };
    Ok((parse(rows)?, parse(cols)?))
}

fn save(figure: &Figure, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", figure.root_name)));
    draw_figure(figure, &path)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let common = &cli.common;

    match &cli.command {
        Commands::Sweeps {
            device,
            filenums,
            folds,
            mode,
            layout,
            data_dir,
            read,
        } => {
            let mut options = SweepFigureOptions {
                data_dir: data_dir.clone(),
                load: read.load_options(),
                ..SweepFigureOptions::default()
            };
            common.apply(&mut options.style);
            let (figure, lines) =
                sweeps_multiple(device, filenums, folds, mode, *layout, &options)?;
            info!("Plotted {} sweeps", lines.len());
            save(&figure, common.output.as_deref())
        }
        Commands::Nmrs {
            filenums,
            mode,
            tstep,
            zerofill,
            data_dir,
        } => {
            let mut options = NmrFigureOptions {
                data_dir: data_dir.clone(),
                tstep: *tstep,
                zerofill_num: *zerofill,
                ..NmrFigureOptions::default()
            };
            common.apply(&mut options.style);
            let (figure, lines) = nmrs_all(filenums, mode, &options)?;
            info!("Plotted {} NMR signals", lines.len());
            save(&figure, common.output.as_deref())
        }
        Commands::FitSim {
            file,
            popt,
            fitmode,
            funcs1,
            funcs2,
            sharenum,
            fmin,
            fmax,
            read,
        } => {
            let mut options = FitCheckSimOptions {
                load: read.load_options(),
                frange: FrequencyWindow::new(*fmin, *fmax)?,
                ..FitCheckSimOptions::default()
            };
            common.apply(&mut options.style);
            let (figure, _) =
                fit_check_sim_file(file, popt, fitmode, funcs1, funcs2, *sharenum, &options)?;
            save(&figure, common.output.as_deref())
        }
        Commands::FitNmr { file, popt, tstep } => {
            let mut options = FitCheckNmrOptions {
                tstep: *tstep,
                ..FitCheckNmrOptions::default()
            };
            common.apply(&mut options.style);
            let (figure, _) = fit_check_nmr_file(file, popt, &options)?;
            save(&figure, common.output.as_deref())
        }
    }
}


// src/main.rs
