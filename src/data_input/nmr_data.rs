// src/data_input/nmr_data.rs

use ndarray::Array1;
use realfft::num_complex::Complex64;
use std::error::Error;
use std::path::Path;
use tracing::debug;

use crate::data_analysis::fft_utils::{fft_forward, fft_rfftfreq};
use crate::data_input::file_naming::file_stem_label;
use crate::data_input::table::Table;
use crate::error::RenderError;
use crate::plot_mode::NmrAxis;

/// NMR free-induction decay with its zero-filled spectrum.
#[derive(Debug, Clone)]
pub struct NmrData {
    pub filename: String,
    pub tstep: f64,
    pub zerofill_num: usize,
    /// Sample times of the raw FID.
    pub t: Array1<f64>,
    pub nmr: Array1<f64>,
    pub t0fill: Array1<f64>,
    pub nmr0fill: Array1<f64>,
    pub f0fill: Array1<f64>,
    pub fftnmr0fill: Array1<Complex64>,
}

impl NmrData {
    /// `zerofill_num` zeros are appended to `fid` before the transform.
    pub fn new(filename: &str, fid: Array1<f64>, tstep: f64, zerofill_num: usize) -> Self {
        let n = fid.len();
        let total = n + zerofill_num;
        let t = Array1::from_iter((0..n).map(|i| i as f64 * tstep));
        let t0fill = Array1::from_iter((0..total).map(|i| i as f64 * tstep));
        let mut nmr0fill = Array1::<f64>::zeros(total);
        nmr0fill.slice_mut(ndarray::s![..n]).assign(&fid);
        let fftnmr0fill = fft_forward(&nmr0fill);
        let f0fill = fft_rfftfreq(total, tstep);
        NmrData {
            filename: filename.to_string(),
            tstep,
            zerofill_num,
            t,
            nmr: fid,
            t0fill,
            nmr0fill,
            f0fill,
            fftnmr0fill,
        }
    }

    pub fn fft_real(&self) -> Array1<f64> {
        self.fftnmr0fill.mapv(|c| c.re)
    }

    pub fn fft_imag(&self) -> Array1<f64> {
        self.fftnmr0fill.mapv(|c| c.im)
    }

    pub fn fft_magnitude(&self) -> Array1<f64> {
        self.fftnmr0fill.mapv(|c| c.norm())
    }

    pub fn fft_phase(&self) -> Array1<f64> {
        self.fftnmr0fill.mapv(|c| c.im.atan2(c.re))
    }

    /// Values plotted for one NMR axis character.
    pub fn channel(&self, axis: NmrAxis) -> Array1<f64> {
        match axis {
            NmrAxis::Time => self.t0fill.clone(),
            NmrAxis::Fid => self.nmr0fill.clone(),
            NmrAxis::Frequency => self.f0fill.clone(),
            NmrAxis::FftReal => self.fft_real(),
            NmrAxis::FftImag => self.fft_imag(),
            NmrAxis::FftMagnitude => self.fft_magnitude(),
            NmrAxis::FftPhase => self.fft_phase(),
        }
    }

    pub fn legend_label(&self) -> String {
        file_stem_label(&self.filename)
    }
}

/// Reads an NMR FID file: the `fid` column if present, otherwise the last column.
pub fn load_nmr(path: &Path, tstep: f64, zerofill_num: usize) -> Result<NmrData, Box<dyn Error>> {
    if !(tstep.is_finite() && tstep > 0.0) {
        return Err(RenderError::InvalidTimeStep { value: tstep }.into());
    }
    let table = Table::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| table.source.clone());
    let column = table
        .column_index("fid")
        .or_else(|| table.headers.len().checked_sub(1))
        .ok_or_else(|| RenderError::MissingColumn {
            column: "fid".to_string(),
            filename: filename.clone(),
        })?;
    let fid = Array1::from(table.numeric_column(column));
    if fid.is_empty() {
        return Err(RenderError::EmptyData { filename }.into());
    }
    debug!(
        "Read {} FID samples from '{}', zero-fill {}",
        fid.len(),
        filename,
        zerofill_num
    );
    Ok(NmrData::new(&filename, fid, tstep, zerofill_num))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_zero_fill_extends_time_and_signal() {
        let data = NmrData::new("NMR_001.dat", array![1.0, 2.0, 3.0, 4.0], 0.5, 4);
        assert_eq!(data.t.len(), 4);
        assert_eq!(data.t0fill.len(), 8);
        assert_eq!(data.t0fill[7], 3.5);
        assert_eq!(data.nmr0fill, array![1.0, 2.0, 3.0, 4.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(data.f0fill.len(), 5);
        assert_eq!(data.fftnmr0fill.len(), 5);
        assert!((data.f0fill[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_fft_channels() {
        let data = NmrData::new("NMR_001.dat", array![1.0, 1.0, 1.0, 1.0], 1.0, 0);
        assert!((data.channel(NmrAxis::FftReal)[0] - 4.0).abs() < 1e-12);
        assert!(data.channel(NmrAxis::FftImag)[0].abs() < 1e-12);
        assert!((data.channel(NmrAxis::FftMagnitude)[0] - 4.0).abs() < 1e-12);
        assert!(data.channel(NmrAxis::FftPhase)[0].abs() < 1e-12);
        assert_eq!(data.legend_label(), "NMR_001");
    }

    #[test]
    fn test_load_nmr_uses_fid_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("NMR_002.dat");
        std::fs::write(&path, "fid,other\n1.0,9\n-1.0,9\n0.5,9\n").unwrap();
        let data = load_nmr(&path, 2e-7, 1).unwrap();
        assert_eq!(data.nmr, array![1.0, -1.0, 0.5]);
        assert_eq!(data.nmr0fill.len(), 4);
        assert_eq!(data.filename, "NMR_002.dat");
        let err = load_nmr(&path, 0.0, 0).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RenderError>(),
            Some(&RenderError::InvalidTimeStep { value: 0.0 })
        );
    }
}
