// tests/fit_check_pipeline_test.rs

use std::path::Path;

use sweep_nmr_render::data_analysis::fit_model::BasisFunction::{Constant, Linear};
use sweep_nmr_render::data_analysis::frequency_window::FrequencyWindow;
use sweep_nmr_render::plot_framework::draw_figure;
use sweep_nmr_render::plot_functions::plot_fit_check_sim::{fit_check_sim_file, FitCheckSimOptions};
use sweep_nmr_render::plot_functions::plot_nmr::{nmrs_all, NmrFigureOptions};
use sweep_nmr_render::plot_functions::plot_sweeps::{sweeps_all, SweepFigureOptions};

/// X = 0.5 + f and Y = f - 1, which the saved parameters below reproduce exactly.
fn write_linear_sweep(dir: &Path) -> std::path::PathBuf {
    let body: String = (1..=6)
        .map(|i| {
            let f = i as f64;
            format!("{},{},{}\n", f, 0.5 + f, f - 1.0)
        })
        .collect();
    let path = dir.join("h1m_010.dat");
    std::fs::write(&path, format!("f,x,y\n{body}")).unwrap();
    path
}

fn write_popt(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("popt.csv");
    std::fs::write(&path, "Filename,c,c0,c1,d0,d1\nh1m_010,0.5,0,1,-1.5,1\n").unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_check_from_files_has_zero_residual() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_linear_sweep(dir.path());
        let popt = write_popt(dir.path());
        let options = FitCheckSimOptions {
            frange: FrequencyWindow::new(Some(2.0), Some(4.0)).unwrap(),
            ..FitCheckSimOptions::default()
        };

        let (figure, handles) = fit_check_sim_file(
            &data,
            &popt,
            "xy",
            &[Constant, Linear],
            &[Constant, Linear],
            1,
            &options,
        )
        .unwrap();

        assert_eq!(figure.root_name, "h1m_010");
        assert_eq!((figure.rows, figure.cols), (2, 2));
        assert_eq!(handles.shape(), [[4, 4], [2, 2]]);

        // Window keeps f = 2, 3, 4 for each of the two channels
        let residual = &figure.panel(1, 1).series[handles.residual[1]];
        assert_eq!(residual.data.len(), 6);
        assert!(residual.data.iter().all(|&(_, r)| r.abs() < 1e-12));

        // The shared constant is the whole main component of the Y channel
        let y_shared = &figure.panel(0, 1).series[handles.y[2]];
        assert!(y_shared.data.iter().all(|&(_, v)| (v - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_fit_check_figure_renders_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_linear_sweep(dir.path());
        let popt = write_popt(dir.path());
        let (figure, _) = fit_check_sim_file(
            &data,
            &popt,
            "xy",
            &[Constant, Linear],
            &[Constant, Linear],
            1,
            &FitCheckSimOptions::default(),
        )
        .unwrap();

        let output = dir.path().join(format!("{}.png", figure.root_name));
        draw_figure(&figure, &output).unwrap();
        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_fit_check_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_linear_sweep(dir.path());
        let popt = dir.path().join("popt.csv");
        std::fs::write(&popt, "Filename,c\nh1m_011,0.5\n").unwrap();

        let result = fit_check_sim_file(
            &data,
            &popt,
            "xy",
            &[Constant],
            &[Constant],
            1,
            &FitCheckSimOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_sweeps_fold_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_linear_sweep(dir.path());
        let options = SweepFigureOptions {
            data_dir: dir.path().to_path_buf(),
            ..SweepFigureOptions::default()
        };
        let err = sweeps_all("h1m", &[10, 10, 10], &[1.0, 2.0], "all", &options).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Numbers of filenums and folds do not match"));
    }

    #[test]
    fn test_nmrs_single_mode_uses_one_panel() {
        let dir = tempfile::tempdir().unwrap();
        for num in [1u32, 2] {
            let body: String = (0..32).map(|i| format!("{}\n", (i as f64 * 0.3).cos())).collect();
            std::fs::write(dir.path().join(format!("NMR_{num:03}.dat")), format!("fid\n{body}"))
                .unwrap();
        }
        let options = NmrFigureOptions {
            data_dir: dir.path().to_path_buf(),
            tstep: 1e-3,
            ..NmrFigureOptions::default()
        };

        let (figure, lines) = nmrs_all(&[1, 2], "td", &options).unwrap();
        assert_eq!((figure.rows, figure.cols), (1, 1));
        assert_eq!(lines, vec![vec![0], vec![1]]);
        assert_eq!(figure.panel(0, 0).series.len(), 2);

        let (figure, lines) = nmrs_all(&[1, 2], "all", &options).unwrap();
        assert_eq!((figure.rows, figure.cols), (1, 3));
        assert_eq!(lines[1], vec![1, 1, 1]);
    }
}

// tests/fit_check_pipeline_test.rs
