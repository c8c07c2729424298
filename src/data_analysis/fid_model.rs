// src/data_analysis/fid_model.rs

use std::f64::consts::PI;

use ndarray::Array1;
use realfft::num_complex::Complex64;

use crate::data_analysis::fft_utils::fft_forward;
use crate::error::{RenderError, RenderResult};

/// Parameters per decaying sinusoid: amplitude, frequency (Hz), T2 (s), phase (rad).
pub const PARAMS_PER_PEAK: usize = 4;

/// Sum of exponentially decaying cosines evaluated on `t`, followed by `zerofill_num` zeros.
pub fn fid_zero_filled(
    t: &Array1<f64>,
    popt: &[f64],
    zerofill_num: usize,
) -> RenderResult<Array1<f64>> {
    if popt.is_empty() || popt.len() % PARAMS_PER_PEAK != 0 {
        return Err(RenderError::ParamCount {
            what: "FID model",
            expected: PARAMS_PER_PEAK * (popt.len() / PARAMS_PER_PEAK).max(1),
            got: popt.len(),
        });
    }
    let mut out = Array1::<f64>::zeros(t.len() + zerofill_num);
    for (i, &ti) in t.iter().enumerate() {
        out[i] = popt
            .chunks_exact(PARAMS_PER_PEAK)
            .map(|p| {
                let (amp, freq, t2, phase) = (p[0], p[1], p[2], p[3]);
                amp * (-ti / t2).exp() * (2.0 * PI * freq * ti + phase).cos()
            })
            .sum();
    }
    Ok(out)
}

/// One-sided spectrum of the zero-filled model FID.
pub fn fid_zero_filled_fft(
    t: &Array1<f64>,
    popt: &[f64],
    zerofill_num: usize,
) -> RenderResult<Array1<Complex64>> {
    Ok(fft_forward(&fid_zero_filled(t, popt, zerofill_num)?))
}
